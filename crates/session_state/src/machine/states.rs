//! Session states - the lifecycle of one capture-to-guide flow

use serde::{Deserialize, Serialize};

/// Defines the possible states of a repair session's lifecycle.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing captured; awaiting a submission.
    Idle,

    /// Media captured and previewed; awaiting the user's go-ahead.
    Captured,

    /// Detection call outstanding.
    Detecting,

    /// Detected items on screen; awaiting the user's selection.
    Selecting,

    /// Diagnosis call outstanding.
    Analyzing,

    /// A completed diagnosis is on screen.
    Presenting,

    /// A detection or diagnosis call failed.
    Failed {
        message: String,
        failed_at: String, // ISO timestamp
    },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl SessionState {
    /// States with no further automatic transition; both await user action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Presenting | Self::Failed { .. })
    }

    /// A gateway call is outstanding. No user-triggered transition may
    /// start another call from these states.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Detecting | Self::Analyzing)
    }

    /// Whether a new capture may replace the session's media.
    pub fn accepts_capture(&self) -> bool {
        matches!(self, Self::Idle | Self::Captured)
    }

    /// Get a human-readable description of the current state.
    pub fn description(&self) -> &str {
        match self {
            Self::Idle => "Ready for a photo or video",
            Self::Captured => "Ready to analyze",
            Self::Detecting => "Looking for repairable items",
            Self::Selecting => "Waiting for an item selection",
            Self::Analyzing => "Building the repair guide",
            Self::Presenting => "Showing the repair guide",
            Self::Failed { .. } => "Failed",
        }
    }
}
