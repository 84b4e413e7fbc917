//! Session events - everything that can trigger a state transition

use serde::{Deserialize, Serialize};

/// Defines the events that can trigger state transitions in the FSM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    // ========== Capture ==========
    /// A normalized submission was accepted.
    MediaCaptured,

    /// The captured media was discarded without a full reset.
    CaptureCleared,

    // ========== Detection ==========
    /// The user confirmed the submission; the detection call starts.
    AnalysisRequested,

    /// Detection finished. A count of zero falls through to the no-focus
    /// diagnosis so the user is never stuck on an empty selection screen.
    DetectionSucceeded { item_count: usize },

    /// Detection failed with a detection-specific message.
    DetectionFailed { error: String },

    // ========== Diagnosis ==========
    /// The user picked an item (or "no specific item"); the diagnosis
    /// call starts.
    ItemSelected { focused: bool },

    /// Diagnosis finished; a result is ready to present.
    DiagnosisSucceeded,

    /// Diagnosis failed with a diagnosis-specific message.
    DiagnosisFailed { error: String },

    // ========== User navigation ==========
    /// Re-enter the selection screen with the retained items.
    AnotherItemRequested,

    /// Jump to presenting a stored diagnosis.
    HistoryEntrySelected,

    /// Return to Idle; history survives.
    SessionReset,
}

impl SessionEvent {
    /// Stable name used in transition errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MediaCaptured => "media_captured",
            Self::CaptureCleared => "capture_cleared",
            Self::AnalysisRequested => "analysis_requested",
            Self::DetectionSucceeded { .. } => "detection_succeeded",
            Self::DetectionFailed { .. } => "detection_failed",
            Self::ItemSelected { .. } => "item_selected",
            Self::DiagnosisSucceeded => "diagnosis_succeeded",
            Self::DiagnosisFailed { .. } => "diagnosis_failed",
            Self::AnotherItemRequested => "another_item_requested",
            Self::HistoryEntrySelected => "history_entry_selected",
            Self::SessionReset => "session_reset",
        }
    }
}
