//! Countdown state, threshold latches and threshold configuration

use serde::{Deserialize, Serialize};

/// Default lead time before zero at which the alarms start
pub const DEFAULT_WARNING_BAND_SECONDS: u64 = 25;
/// Default remaining time at which the explosion fires
pub const DEFAULT_IMPACT_AT_SECONDS: u64 = 3;

/// Lifecycle phase of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Armed,
    Expired,
}

/// Remaining-time state of the clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining: u64,
    pub total: u64,
    pub phase: Phase,
    /// Incremented on every arm so observers can tell runs apart
    pub run: u64,
}

impl CountdownState {
    /// Create a new idle countdown
    pub fn new() -> Self {
        Self {
            remaining: 0,
            total: 0,
            phase: Phase::Idle,
            run: 0,
        }
    }

    /// Create an armed countdown for a fresh run
    pub fn armed(duration: u64, run: u64) -> Self {
        Self {
            remaining: duration,
            total: duration,
            phase: Phase::Armed,
            run,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.phase == Phase::Armed
    }

    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Expired
    }

    /// Seconds consumed since the run was armed
    pub fn elapsed(&self) -> u64 {
        self.total.saturating_sub(self.remaining)
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot latches, so loud effects fire once per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdFlags {
    pub alarm_started: bool,
    pub countdown_sound_started: bool,
    pub explosion_fired: bool,
}

impl ThresholdFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clear only the latches owned by the warning band
    pub fn leave_warning_band(&mut self) {
        self.alarm_started = false;
        self.countdown_sound_started = false;
    }
}

/// Remaining-time values at which side effects fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning_band: u64,
    pub impact_at: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning_band: DEFAULT_WARNING_BAND_SECONDS,
            impact_at: DEFAULT_IMPACT_AT_SECONDS,
        }
    }
}
