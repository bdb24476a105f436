//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use image::DynamicImage;
use shutaap::{
    render::AssetSet,
    services::{SideEffects, SoundId},
    state::{AppState, CountdownEngine, CountdownOptions, SystemActionChoice, Thresholds},
    storage::SettingsStore,
};

/// One call made to the side-effect dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Play { sound: SoundId, looping: bool, seek: u64 },
    StopAll,
    VibrateStart,
    VibrateStop,
    SystemAction(SystemActionChoice),
}

/// Records every request; optionally fails sound playback
#[derive(Debug, Default)]
pub struct RecordingEffects {
    calls: Mutex<Vec<Effect>>,
    fail_sounds: bool,
}

impl RecordingEffects {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every sound reports a missing device, everything else succeeds
    pub fn failing_sounds() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_sounds: true,
        })
    }

    pub fn calls(&self) -> Vec<Effect> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, effect: &Effect) -> usize {
        self.calls().iter().filter(|call| *call == effect).count()
    }

    pub fn plays_of(&self, sound: SoundId) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Effect::Play { sound: s, .. } if *s == sound))
            .count()
    }

    pub fn system_actions(&self) -> Vec<SystemActionChoice> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Effect::SystemAction(choice) => Some(choice),
                _ => None,
            })
            .collect()
    }

    fn record(&self, effect: Effect) {
        self.calls.lock().unwrap().push(effect);
    }
}

impl SideEffects for RecordingEffects {
    fn play_sound(&self, sound: SoundId, looping: bool, seek_seconds: u64) -> Result<(), String> {
        self.record(Effect::Play { sound, looping, seek: seek_seconds });
        if self.fail_sounds {
            return Err(format!("no audio device for {}", sound));
        }
        Ok(())
    }

    fn stop_all(&self) -> Result<(), String> {
        self.record(Effect::StopAll);
        Ok(())
    }

    fn vibrate_start(&self) -> Result<(), String> {
        self.record(Effect::VibrateStart);
        Ok(())
    }

    fn vibrate_stop(&self) -> Result<(), String> {
        self.record(Effect::VibrateStop);
        Ok(())
    }

    fn perform_system_action(&self, choice: SystemActionChoice) -> Result<(), String> {
        self.record(Effect::SystemAction(choice));
        Ok(())
    }
}

pub fn engine(effects: &Arc<RecordingEffects>) -> CountdownEngine {
    let effects: Arc<dyn SideEffects> = effects.clone();
    CountdownEngine::new(Thresholds::default(), effects)
}

/// A settings path nobody else is using
pub fn temp_settings_path(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let unique = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("shutaap-test-{}-{}-{}", std::process::id(), name, unique))
        .join("settings.json")
}

pub fn tiny_assets() -> AssetSet {
    AssetSet::from_images(
        DynamicImage::new_rgba8(200, 200),
        DynamicImage::new_rgba8(10, 40),
        DynamicImage::new_rgba8(10, 70),
        DynamicImage::new_rgba8(100, 100),
        0.5,
        0.5,
    )
}

pub fn app_state(
    effects: &Arc<RecordingEffects>,
    options: CountdownOptions,
    settings_name: &str,
) -> Arc<AppState> {
    let dyn_effects: Arc<dyn SideEffects> = effects.clone();
    Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        options,
        dyn_effects,
        SettingsStore::load(temp_settings_path(settings_name)),
        Arc::new(tiny_assets()),
    ))
}
