//! State management module
//! 
//! This module contains the countdown engine, its state types and the
//! application state shared with the HTTP handlers and background tasks.

pub mod action;
pub mod app_state;
pub mod countdown;
pub mod engine;
pub mod vibration;

// Re-export main types
pub use action::SystemActionChoice;
pub use app_state::{AppState, CountdownOptions, PressError, PressOutcome, PressPolicy};
pub use countdown::{CountdownState, Phase, ThresholdFlags, Thresholds};
pub use engine::{CountdownEngine, EngineError};
pub use vibration::{VibrationState, WindowOffset, VIBRATION_INTERVAL, VIBRATION_OFFSETS};
