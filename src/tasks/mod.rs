//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod expiry;
pub mod ticker;

// Re-export main functions
pub use expiry::expiry_watch_task;
pub use ticker::{countdown_ticker_task, SecondClock};
