//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{CountdownState, PressOutcome, SystemActionChoice, ThresholdFlags},
    storage::Settings,
};

/// API response structure for endpoints that change the countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, countdown: CountdownState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            countdown,
        }
    }

    /// Response for an accepted press
    pub fn pressed(outcome: PressOutcome, countdown: CountdownState) -> Self {
        let (status, message) = match outcome {
            PressOutcome::Armed => ("armed", format!("Countdown armed for {}s", countdown.total)),
            PressOutcome::Extended => ("extended", format!("Countdown extended, {}s remaining", countdown.remaining)),
        };
        Self::new(status.to_string(), message, countdown)
    }

    /// Create an idle response
    pub fn idle(message: String, countdown: CountdownState) -> Self {
        Self::new("idle".to_string(), message, countdown)
    }
}

/// Error body returned with 4xx/5xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Status response with latches and persisted settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownState,
    pub flags: ThresholdFlags,
    pub action: SystemActionChoice,
    pub settings: Settings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
