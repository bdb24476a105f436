//! Window shake pattern used while the alarm is going

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How often the window jumps to the next offset
pub const VIBRATION_INTERVAL: Duration = Duration::from_millis(100);

/// Positional deltas cycled through while vibrating
pub const VIBRATION_OFFSETS: [WindowOffset; 4] = [
    WindowOffset { x: -5, y: 0 },
    WindowOffset { x: 5, y: 0 },
    WindowOffset { x: 0, y: -5 },
    WindowOffset { x: 0, y: 5 },
];

/// Displacement of the window from its resting position, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOffset {
    pub x: i32,
    pub y: i32,
}

impl WindowOffset {
    pub const ORIGIN: WindowOffset = WindowOffset { x: 0, y: 0 };
}

/// Position in the cyclic shake sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VibrationState {
    index: usize,
    offset: WindowOffset,
}

impl VibrationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next offset in the sequence and return it
    pub fn step(&mut self) -> WindowOffset {
        self.offset = VIBRATION_OFFSETS[self.index];
        self.index = (self.index + 1) % VIBRATION_OFFSETS.len();
        self.offset
    }

    pub fn offset(&self) -> WindowOffset {
        self.offset
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Back to the resting position
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
