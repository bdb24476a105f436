//! API request structures and their validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::SystemActionChoice;

/// Upper bound on the hours field
pub const MAX_HOURS: i64 = 24;

/// Rejected red-button input; the engine is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} must be a non-negative integer, got {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("hours must be between 0 and 24, got {0}")]
    HoursOutOfRange(i64),
    #[error("duration is too long")]
    TooLong,
    #[error("enter a duration of at least one second")]
    ZeroDuration,
    #[error("unknown system action '{0}', expected shutdown, restart, sleep or none")]
    UnknownAction(String),
}

/// Body of `POST /press`: what the configuration prompt collects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PressRequest {
    #[serde(default)]
    pub hours: Option<i64>,
    #[serde(default)]
    pub minutes: Option<i64>,
    #[serde(default)]
    pub seconds: Option<i64>,
    /// Falls back to the saved action when absent
    #[serde(default)]
    pub action: Option<String>,
}

/// A press that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidPress {
    pub duration: u64,
    pub action: SystemActionChoice,
}

fn non_negative(field: &'static str, value: Option<i64>) -> Result<u64, InputError> {
    let value = value.unwrap_or(0);
    u64::try_from(value).map_err(|_| InputError::Negative { field, value })
}

impl PressRequest {
    /// Check every field independently and total them up
    pub fn validate(&self, saved_action: SystemActionChoice) -> Result<ValidPress, InputError> {
        let hours = non_negative("hours", self.hours)?;
        let minutes = non_negative("minutes", self.minutes)?;
        let seconds = non_negative("seconds", self.seconds)?;

        if hours > MAX_HOURS as u64 {
            return Err(InputError::HoursOutOfRange(hours as i64));
        }

        let duration = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(hours * 3600))
            .and_then(|total| total.checked_add(seconds))
            .ok_or(InputError::TooLong)?;
        if duration == 0 {
            return Err(InputError::ZeroDuration);
        }

        let action = match &self.action {
            Some(name) => SystemActionChoice::from_name(name)
                .ok_or_else(|| InputError::UnknownAction(name.clone()))?,
            None => saved_action,
        };

        Ok(ValidPress { duration, action })
    }
}
