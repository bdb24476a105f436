//! Side-effect services module
//!
//! This module contains the dispatcher the countdown fires effects through,
//! sound playback and system operations like shutdown.

pub mod dispatcher;
pub mod sound;
pub mod system;

// Re-export main types and functions
pub use dispatcher::{Dispatcher, DispatcherConfig, SideEffects};
pub use sound::{AudioOutput, SoundId};
pub use system::*;
