//! Shutaap - A doomsday clock service
//!
//! This library provides a countdown engine that plays escalating sound
//! effects, shakes the clock as time runs out and performs a system action
//! (shutdown, restart or sleep) at zero, plus the HTTP surface a clock
//! front-end drives it through.

pub mod config;
pub mod state;
pub mod api;
pub mod render;
pub mod services;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, CountdownEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
