//! Settings file persistence and recovery from bad files.

mod common;

use std::fs;

use common::temp_settings_path;
use shutaap::{
    state::SystemActionChoice,
    storage::{load_settings_from_disk, Settings, SettingsStore},
};

fn write_raw(name: &str, contents: &str) -> std::path::PathBuf {
    let path = temp_settings_path(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn missing_file_gives_defaults() {
    let settings = load_settings_from_disk(&temp_settings_path("missing"));
    assert_eq!(settings.total_seconds, 0);
    assert_eq!(settings.action(), SystemActionChoice::Shutdown);
}

#[test]
fn malformed_file_gives_defaults() {
    for contents in [
        "not json at all",
        "{\"total increase in timer\": -5}",
        "{\"total increase in timer\": \"ten\", \"system action\": \"shutdown\"}",
        "{\"system action\": \"explode\"}",
        "[]",
    ] {
        let path = write_raw("malformed", contents);
        assert_eq!(load_settings_from_disk(&path), Settings::default(), "for {}", contents);
    }
}

#[test]
fn reads_the_record_format() {
    let path = write_raw(
        "format",
        r#"{ "total increase in timer": 3600, "system action": "restart" }"#,
    );
    let settings = load_settings_from_disk(&path);
    assert_eq!(settings.total_seconds, 3600);
    assert_eq!(settings.action(), SystemActionChoice::Restart);
}

#[test]
fn store_rewrites_the_file() {
    let path = temp_settings_path("store");
    let store = SettingsStore::load(&path);
    assert_eq!(store.get(), Settings::default());

    store.save(Settings::new(45, SystemActionChoice::Sleep)).unwrap();
    store.save(Settings::new(90, SystemActionChoice::None)).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["total increase in timer"], 90);
    assert_eq!(raw["system action"], serde_json::Value::Null);

    let reloaded = SettingsStore::load(&path);
    assert_eq!(reloaded.get().total_seconds, 90);
    assert_eq!(reloaded.get().action(), SystemActionChoice::None);
}
