//! Persistence module
//!
//! The only thing shutaap remembers between runs is the red-button settings.

pub mod settings;

pub use settings::{default_settings_path, load_settings_from_disk, save_settings_to_disk, Settings, SettingsStore};
