//! Side-effect dispatcher: sounds, vibration and system actions
//!
//! Every call returns immediately. Sounds are queued on the audio thread,
//! vibration and system actions run as tokio tasks; nothing here is awaited
//! on the tick path.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tokio::{
    runtime::Handle,
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::state::{SystemActionChoice, VibrationState, WindowOffset, VIBRATION_INTERVAL};
use super::{execute_system_action, AudioOutput, SoundId};

/// Fire-and-forget effects requested by the countdown engine
pub trait SideEffects: Send + Sync {
    /// Start playing a sound, optionally looping, optionally from an offset
    fn play_sound(&self, sound: SoundId, looping: bool, seek_seconds: u64) -> Result<(), String>;

    /// Silence every sound currently playing
    fn stop_all(&self) -> Result<(), String>;

    fn vibrate_start(&self) -> Result<(), String>;

    fn vibrate_stop(&self) -> Result<(), String>;

    /// Kick off the system action without waiting for it
    fn perform_system_action(&self, choice: SystemActionChoice) -> Result<(), String>;

    /// Current window displacement caused by vibration
    fn vibration_offset(&self) -> WindowOffset {
        WindowOffset::ORIGIN
    }

    /// Hand over in-flight system action tasks so the caller can await them
    fn take_pending_actions(&self) -> Vec<JoinHandle<Result<(), String>>> {
        Vec::new()
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub sounds_dir: PathBuf,
    /// Skip playback, keep everything else
    pub mute: bool,
    /// Log system actions instead of running them
    pub dry_run: bool,
}

/// Tokio and rodio backed implementation of [`SideEffects`]
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatcherConfig,
    /// `None` when muted or when no output device could be opened
    audio: Option<AudioOutput>,
    vibration_task: Mutex<Option<JoinHandle<()>>>,
    offset_tx: Arc<watch::Sender<WindowOffset>>,
    /// Keep the receiver alive to prevent channel closure
    _offset_rx: watch::Receiver<WindowOffset>,
    actions: Mutex<Vec<JoinHandle<Result<(), String>>>>,
}

impl Dispatcher {
    /// Create the dispatcher, opening the audio device unless muted
    pub fn new(config: DispatcherConfig) -> Self {
        let audio = if config.mute {
            info!("Sound muted");
            None
        } else {
            match AudioOutput::open() {
                Ok(audio) => Some(audio),
                Err(e) => {
                    warn!("Sound disabled: {}", e);
                    None
                }
            }
        };

        Self::with_audio(config, audio)
    }

    /// Create the dispatcher around an already opened output
    pub fn with_audio(config: DispatcherConfig, audio: Option<AudioOutput>) -> Self {
        let (offset_tx, offset_rx) = watch::channel(WindowOffset::ORIGIN);

        Self {
            config,
            audio,
            vibration_task: Mutex::new(None),
            offset_tx: Arc::new(offset_tx),
            _offset_rx: offset_rx,
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to vibration offset changes
    pub fn subscribe_offset(&self) -> watch::Receiver<WindowOffset> {
        self.offset_tx.subscribe()
    }

    fn runtime() -> Result<Handle, String> {
        Handle::try_current().map_err(|e| format!("No async runtime for side effect: {}", e))
    }
}

impl SideEffects for Dispatcher {
    fn play_sound(&self, sound: SoundId, looping: bool, seek_seconds: u64) -> Result<(), String> {
        let path = sound.path_in(&self.config.sounds_dir);
        if !path.exists() {
            return Err(format!("Sound {} not found at {}", sound, path.display()));
        }

        if self.config.mute {
            debug!("Muted: skipping {} (loop={}, seek={}s)", sound, looping, seek_seconds);
            return Ok(());
        }

        let audio = self.audio.as_ref()
            .ok_or_else(|| format!("No audio output for {}", sound))?;
        audio.play(sound, path, looping, seek_seconds)?;

        debug!("Playing {} (loop={}, seek={}s)", sound, looping, seek_seconds);
        Ok(())
    }

    fn stop_all(&self) -> Result<(), String> {
        match &self.audio {
            Some(audio) => audio.stop_all(),
            None => Ok(()),
        }
    }

    fn vibrate_start(&self) -> Result<(), String> {
        let mut task = self.vibration_task.lock()
            .map_err(|e| format!("Failed to lock vibration task: {}", e))?;

        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Ok(());
        }

        let runtime = Self::runtime()?;
        let offset_tx = Arc::clone(&self.offset_tx);
        *task = Some(runtime.spawn(async move {
            let mut vibration = VibrationState::new();
            let mut ticker = interval(VIBRATION_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                offset_tx.send_replace(vibration.step());
            }
        }));

        info!("Vibration started");
        Ok(())
    }

    fn vibrate_stop(&self) -> Result<(), String> {
        let mut task = self.vibration_task.lock()
            .map_err(|e| format!("Failed to lock vibration task: {}", e))?;

        if let Some(handle) = task.take() {
            handle.abort();
            info!("Vibration stopped");
        }
        self.offset_tx.send_replace(WindowOffset::ORIGIN);
        Ok(())
    }

    fn perform_system_action(&self, choice: SystemActionChoice) -> Result<(), String> {
        if choice.is_noop() {
            info!("Countdown finished with no system action");
            return Ok(());
        }

        let runtime = Self::runtime()?;
        let dry_run = self.config.dry_run;
        let handle = runtime.spawn(async move {
            let result = execute_system_action(choice, dry_run).await;
            if let Err(e) = &result {
                warn!("System {} failed: {}", choice, e);
            }
            result
        });

        self.actions.lock()
            .map_err(|e| format!("Failed to lock action list: {}", e))?
            .push(handle);
        Ok(())
    }

    fn vibration_offset(&self) -> WindowOffset {
        *self.offset_tx.borrow()
    }

    fn take_pending_actions(&self) -> Vec<JoinHandle<Result<(), String>>> {
        match self.actions.lock() {
            Ok(mut actions) => actions.drain(..).collect(),
            Err(e) => {
                warn!("Failed to lock action list: {}", e);
                Vec::new()
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if let Ok(mut task) = self.vibration_task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}
