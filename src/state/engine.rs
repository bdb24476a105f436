//! Countdown engine: the clock's state machine
//!
//! The engine owns the remaining time and the one-shot latches. It advances
//! one logical second per [`CountdownEngine::tick`] and asks the side-effect
//! dispatcher for sounds, vibration and the final system action when the
//! remaining time crosses its thresholds. Dispatcher failures are logged and
//! never stop the clock.

use std::{fmt, sync::Arc, time::Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::services::{SideEffects, SoundId};
use super::{CountdownState, Phase, SystemActionChoice, ThresholdFlags, Thresholds};

/// Requests the engine refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("countdown duration must be at least one second")]
    ZeroDuration,
    #[error("no countdown is running")]
    NotArmed,
}

pub struct CountdownEngine {
    state: CountdownState,
    flags: ThresholdFlags,
    thresholds: Thresholds,
    action: SystemActionChoice,
    /// When the current run was armed; the first second ends one second later
    armed_at: Option<Instant>,
    effects: Arc<dyn SideEffects>,
}

impl CountdownEngine {
    /// Create an idle engine firing effects through `effects`
    pub fn new(thresholds: Thresholds, effects: Arc<dyn SideEffects>) -> Self {
        Self {
            state: CountdownState::new(),
            flags: ThresholdFlags::default(),
            thresholds,
            action: SystemActionChoice::default(),
            armed_at: None,
            effects,
        }
    }

    /// Start a new run of `duration` seconds, discarding any run in progress
    pub fn arm(&mut self, duration: u64, action: SystemActionChoice) -> Result<(), EngineError> {
        if duration == 0 {
            return Err(EngineError::ZeroDuration);
        }

        if self.state.is_armed() {
            info!("Re-arming countdown with {}s still remaining", self.state.remaining);
        }

        // Silence whatever the previous run left behind
        report("stop all sounds", self.effects.stop_all());
        report("stop vibration", self.effects.vibrate_stop());

        self.state = CountdownState::armed(duration, self.state.run + 1);
        self.flags.reset();
        self.action = action;
        self.armed_at = Some(Instant::now());

        info!("Countdown armed: {}s, then {}", duration, action);
        report("ticking sound", self.effects.play_sound(SoundId::Ticking, true, 0));

        self.evaluate_thresholds();
        Ok(())
    }

    /// Advance the countdown by one second; returns the phase afterwards
    pub fn tick(&mut self) -> Phase {
        if !self.state.is_armed() {
            return self.state.phase;
        }

        self.state.remaining = self.state.remaining.saturating_sub(1);
        debug!("Tick: {}s remaining", self.state.remaining);

        self.evaluate_thresholds();
        self.state.phase
    }

    /// Add time to the running countdown
    pub fn add_time(&mut self, seconds: u64) -> Result<(), EngineError> {
        if !self.state.is_armed() {
            return Err(EngineError::NotArmed);
        }

        self.state.remaining = self.state.remaining.saturating_add(seconds);
        self.state.total = self.state.total.saturating_add(seconds);
        info!("Added {}s, {}s remaining", seconds, self.state.remaining);

        self.evaluate_thresholds();
        Ok(())
    }

    /// Cancel the running countdown. Returns false when nothing was running
    pub fn disarm(&mut self) -> bool {
        if !self.state.is_armed() {
            return false;
        }

        report("stop all sounds", self.effects.stop_all());
        report("stop vibration", self.effects.vibrate_stop());

        let run = self.state.run;
        self.state = CountdownState::new();
        self.state.run = run;
        self.flags.reset();
        self.armed_at = None;

        info!("Countdown cancelled");
        true
    }

    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    pub fn flags(&self) -> ThresholdFlags {
        self.flags
    }

    pub fn action(&self) -> SystemActionChoice {
        self.action
    }

    /// Change what happens at zero without touching the clock
    pub fn set_action(&mut self, action: SystemActionChoice) {
        if action != self.action {
            info!("System action changed from {} to {}", self.action, action);
            self.action = action;
        }
    }

    pub fn armed_at(&self) -> Option<Instant> {
        self.armed_at
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    fn evaluate_thresholds(&mut self) {
        let remaining = self.state.remaining;
        let band = self.thresholds.warning_band;

        if remaining <= band && !self.flags.countdown_sound_started {
            info!("Entering warning band with {}s remaining", remaining);
            report("start vibration", self.effects.vibrate_start());
            // Line the countdown track up with the time actually left
            report(
                "countdown sound",
                self.effects.play_sound(SoundId::Countdown, false, band - remaining),
            );
            self.flags.countdown_sound_started = true;

            if !self.flags.alarm_started {
                report("alarm sound", self.effects.play_sound(SoundId::Alarm, true, 0));
                self.flags.alarm_started = true;
            }
        } else if remaining > band && self.flags.countdown_sound_started {
            info!("Back above warning band with {}s remaining", remaining);
            report("stop vibration", self.effects.vibrate_stop());
            report("stop all sounds", self.effects.stop_all());
            report("ticking sound", self.effects.play_sound(SoundId::Ticking, true, 0));
            self.flags.leave_warning_band();
        }

        if remaining == self.thresholds.impact_at && !self.flags.explosion_fired {
            info!("Impact at {}s", remaining);
            report("bomb beeps", self.effects.play_sound(SoundId::BombBeeps, false, 0));
            report("explosion", self.effects.play_sound(SoundId::Explosion, false, 0));
            self.flags.explosion_fired = true;
        }

        if remaining == 0 {
            report("stop vibration", self.effects.vibrate_stop());
            report("system action", self.effects.perform_system_action(self.action));
            self.state.phase = Phase::Expired;
            info!("Countdown expired, system {} requested", self.action);
        }
    }
}

impl fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.state)
            .field("flags", &self.flags)
            .field("thresholds", &self.thresholds)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Side effects are best effort
fn report(effect: &str, result: Result<(), String>) {
    if let Err(e) = result {
        warn!("Side effect '{}' failed: {}", effect, e);
    }
}
