//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    render::{render_frame, AssetSet, Frame},
    services::SideEffects,
    storage::{Settings, SettingsStore},
    utils::format_uptime,
};
use super::{CountdownEngine, CountdownState, EngineError, Phase, SystemActionChoice, ThresholdFlags, Thresholds};

/// What a press does while a countdown is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PressPolicy {
    /// Add the entered time to the running countdown
    #[default]
    Accumulate,
    /// Refuse the press
    Ignore,
}

/// Countdown behavior chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownOptions {
    pub thresholds: Thresholds,
    pub press_policy: PressPolicy,
    /// Shorter requests are raised to this many seconds
    pub min_seconds: u64,
}

impl Default for CountdownOptions {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            press_policy: PressPolicy::Accumulate,
            min_seconds: 10,
        }
    }
}

/// Result of an accepted press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressOutcome {
    Armed,
    Extended,
}

#[derive(Debug, Error)]
pub enum PressError {
    #[error("a countdown is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Internal(String),
}

/// Main application state that owns the countdown engine
pub struct AppState {
    pub engine: Arc<Mutex<CountdownEngine>>,
    pub effects: Arc<dyn SideEffects>,
    pub settings: SettingsStore,
    pub assets: Arc<AssetSet>,
    pub options: CountdownOptions,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for countdown updates
    pub countdown_tx: watch::Sender<CountdownState>,
    /// Keep the receiver alive to prevent channel closure
    pub _countdown_rx: watch::Receiver<CountdownState>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        options: CountdownOptions,
        effects: Arc<dyn SideEffects>,
        settings: SettingsStore,
        assets: Arc<AssetSet>,
    ) -> Self {
        let (countdown_tx, countdown_rx) = watch::channel(CountdownState::new());
        let engine = CountdownEngine::new(options.thresholds, Arc::clone(&effects));

        Self {
            engine: Arc::new(Mutex::new(engine)),
            effects,
            settings,
            assets,
            options,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            countdown_tx,
            _countdown_rx: countdown_rx,
        }
    }

    /// Run `f` against the locked engine and publish the resulting state
    fn with_engine<T, F>(&self, action: Option<&str>, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut CountdownEngine) -> T,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))?;

        let result = f(&mut *engine);
        let snapshot = engine.state().clone();
        drop(engine); // Release the lock early

        if let Some(action) = action {
            self.record_action(action);
        }

        // Notify countdown watchers
        self.countdown_tx.send_replace(snapshot);
        Ok(result)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// The red button: arm a countdown, or apply the press policy while one runs
    ///
    /// `duration` has already been validated as positive; it is raised to the
    /// configured minimum. An accumulating press also takes over `action`.
    /// The run's total and action are persisted on every accepted press.
    pub fn press(&self, duration: u64, action: SystemActionChoice) -> Result<PressOutcome, PressError> {
        let duration = duration.max(self.options.min_seconds);
        let policy = self.options.press_policy;

        let (outcome, total, action) = self.with_engine(Some("press"), |engine| -> Result<_, PressError> {
            let outcome = if engine.state().is_armed() {
                match policy {
                    PressPolicy::Accumulate => {
                        engine.add_time(duration)?;
                        engine.set_action(action);
                        PressOutcome::Extended
                    }
                    PressPolicy::Ignore => return Err(PressError::AlreadyRunning),
                }
            } else {
                engine.arm(duration, action)?;
                PressOutcome::Armed
            };
            Ok((outcome, engine.state().total, engine.action()))
        }).map_err(PressError::Internal)??;

        if let Err(e) = self.settings.save(Settings::new(total, action)) {
            warn!("Failed to persist settings: {}", e);
        }

        info!("Press accepted: {:?} with {}s, run total {}s", outcome, duration, total);
        Ok(outcome)
    }

    /// Arm from the persisted settings; false when they hold no duration
    pub fn arm_from_settings(&self) -> Result<bool, PressError> {
        let settings = self.settings.get();
        if settings.total_seconds == 0 {
            info!("No saved duration, waiting for a press");
            return Ok(false);
        }

        let duration = settings.total_seconds.max(self.options.min_seconds);
        self.with_engine(Some("arm-on-start"), |engine| engine.arm(duration, settings.action()))
            .map_err(PressError::Internal)??;
        Ok(true)
    }

    /// Cancel the running countdown
    pub fn cancel(&self) -> Result<bool, String> {
        self.with_engine(Some("cancel"), |engine| engine.disarm())
    }

    /// Advance the countdown by one second
    pub fn tick(&self) -> Result<Phase, String> {
        self.with_engine(None, |engine| engine.tick())
    }

    /// Get current countdown state
    pub fn get_countdown(&self) -> Result<CountdownState, String> {
        self.engine.lock()
            .map(|engine| engine.state().clone())
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))
    }

    /// Countdown state and the instant its run was armed
    pub fn get_run_anchor(&self) -> Result<(CountdownState, Option<Instant>), String> {
        self.engine.lock()
            .map(|engine| (engine.state().clone(), engine.armed_at()))
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))
    }

    /// Countdown state, latches and configured action in one lock
    pub fn get_snapshot(&self) -> Result<(CountdownState, ThresholdFlags, SystemActionChoice), String> {
        self.engine.lock()
            .map(|engine| (engine.state().clone(), engine.flags(), engine.action()))
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))
    }

    /// Render the current frame
    pub fn frame(&self) -> Result<Frame, String> {
        let state = self.get_countdown()?;
        Ok(render_frame(&state, &self.assets.layout(), self.effects.vibration_offset()))
    }

    /// Subscribe to countdown changes
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.countdown_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
