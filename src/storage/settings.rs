//! Persisted red-button settings
//!
//! A flat JSON record stored in `<config dir>/shutaap/settings.json`:
//!
//! ```json
//! { "total increase in timer": 90, "system action": "shutdown" }
//! ```
//!
//! `"system action"` may be `null` for no action. A missing or unreadable
//! file yields the defaults (`shutdown`, 0 seconds).

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::state::SystemActionChoice;

/// User settings remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "total increase in timer", default)]
    pub total_seconds: u64,
    #[serde(rename = "system action", default = "default_system_action")]
    pub system_action: Option<SystemActionChoice>,
}

fn default_system_action() -> Option<SystemActionChoice> {
    Some(SystemActionChoice::Shutdown)
}

impl Settings {
    pub fn new(total_seconds: u64, action: SystemActionChoice) -> Self {
        Self {
            total_seconds,
            // "none" is stored as null
            system_action: (!action.is_noop()).then_some(action),
        }
    }

    pub fn action(&self) -> SystemActionChoice {
        self.system_action.unwrap_or(SystemActionChoice::None)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(0, SystemActionChoice::Shutdown)
    }
}

/// Default settings path for the current user
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shutaap")
        .join("settings.json")
}

/// Read settings from `path`, falling back to defaults on any problem
pub fn load_settings_from_disk(path: &Path) -> Settings {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("No settings at {} ({}), using defaults", path.display(), e);
            return Settings::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Settings at {} are malformed ({}), using defaults", path.display(), e);
            Settings::default()
        }
    }
}

/// Write settings to `path`, creating the parent directory if needed
pub fn save_settings_to_disk(path: &Path, settings: &Settings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory {}: {}", parent.display(), e))?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    fs::write(path, json)
        .map_err(|e| format!("Failed to write settings to {}: {}", path.display(), e))
}

/// Cached settings backed by a file
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: Mutex<Settings>,
}

impl SettingsStore {
    /// Load the store from `path`
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_settings_from_disk(&path);
        info!(
            "Settings loaded from {}: {}s, action {}",
            path.display(),
            current.total_seconds,
            current.action()
        );

        Self {
            path,
            current: Mutex::new(current),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings, defaults if the cache is poisoned
    pub fn get(&self) -> Settings {
        self.current
            .lock()
            .map(|settings| settings.clone())
            .unwrap_or_default()
    }

    /// Replace the settings and rewrite the file
    ///
    /// The cache is updated even when the write fails.
    pub fn save(&self, settings: Settings) -> Result<(), String> {
        match self.current.lock() {
            Ok(mut current) => *current = settings.clone(),
            Err(e) => warn!("Failed to lock settings cache: {}", e),
        }

        save_settings_to_disk(&self.path, &settings)?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}
