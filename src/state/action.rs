//! System action chosen for the end of the countdown

use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with the machine once the countdown reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemActionChoice {
    #[default]
    Shutdown,
    Restart,
    Sleep,
    None,
}

impl SystemActionChoice {
    /// Every choice, in the order a picker would list them
    pub const ALL: [SystemActionChoice; 4] = [
        SystemActionChoice::Shutdown,
        SystemActionChoice::Restart,
        SystemActionChoice::Sleep,
        SystemActionChoice::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemActionChoice::Shutdown => "shutdown",
            SystemActionChoice::Restart => "restart",
            SystemActionChoice::Sleep => "sleep",
            SystemActionChoice::None => "none",
        }
    }

    /// Parse a choice by name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|choice| choice.as_str() == name)
    }

    /// Whether reaching zero actually touches the machine
    pub fn is_noop(&self) -> bool {
        matches!(self, SystemActionChoice::None)
    }
}

impl fmt::Display for SystemActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
