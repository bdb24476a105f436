//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::{
    services::DispatcherConfig,
    state::{
        countdown::{DEFAULT_IMPACT_AT_SECONDS, DEFAULT_WARNING_BAND_SECONDS},
        CountdownOptions, PressPolicy, Thresholds,
    },
    storage::default_settings_path,
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "shutaap")]
#[command(about = "A doomsday clock: counts down, sounds the alarm, then shuts the machine down")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding clock.png, hour_hand.png, minute_hand.png and red-button.png
    #[arg(long, default_value = "images")]
    pub assets_dir: PathBuf,

    /// Directory holding the sound effects
    #[arg(long, default_value = "sounds")]
    pub sounds_dir: PathBuf,

    /// Scale factor applied to the clock face
    #[arg(long, default_value = "0.15")]
    pub scale: f64,

    /// Scale factor applied to the red button
    #[arg(long, default_value = "0.15")]
    pub button_scale: f64,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Ticker cadence in milliseconds; the countdown still moves one second per second
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(10..))]
    pub tick_ms: u64,

    /// Seconds before zero at which vibration and alarms start
    #[arg(long, default_value_t = DEFAULT_WARNING_BAND_SECONDS)]
    pub warning_band: u64,

    /// Remaining seconds at which the explosion fires
    #[arg(long, default_value_t = DEFAULT_IMPACT_AT_SECONDS)]
    pub impact_at: u64,

    /// Shortest countdown a press can arm, in seconds
    #[arg(long, default_value = "10")]
    pub min_seconds: u64,

    /// What a press does while a countdown is running
    #[arg(long, value_enum, default_value_t = PressPolicy::Accumulate)]
    pub press_policy: PressPolicy,

    /// Do not play any sound
    #[arg(long)]
    pub mute: bool,

    /// Log the system action instead of performing it
    #[arg(long)]
    pub dry_run: bool,

    /// Arm immediately with the saved duration
    #[arg(long)]
    pub arm_on_start: bool,

    /// Keep serving after the countdown expires
    #[arg(long)]
    pub keep_running: bool,

    /// Seconds to let sounds play out after expiry
    #[arg(long, default_value = "5")]
    pub linger_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(default_settings_path)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn linger(&self) -> Duration {
        Duration::from_secs(self.linger_secs)
    }

    pub fn countdown_options(&self) -> CountdownOptions {
        CountdownOptions {
            thresholds: Thresholds {
                warning_band: self.warning_band,
                impact_at: self.impact_at,
            },
            press_policy: self.press_policy,
            min_seconds: self.min_seconds.max(1),
        }
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            sounds_dir: self.sounds_dir.clone(),
            mute: self.mute,
            dry_run: self.dry_run,
        }
    }
}
