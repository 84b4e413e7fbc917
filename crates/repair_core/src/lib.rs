//! repair_core - Shared domain types for the repair diagnosis system
//!
//! Hub types used across the workspace: captured media, detection and
//! diagnosis results, conversation transcripts, and the session history log.

pub mod diagnosis;
pub mod history;
pub mod media;
pub mod transcript;

// Re-export commonly used types
pub use diagnosis::{Annotation, BoundingBox, DetectedItem, DiagnosisResult, RepairStep, GRID_SIZE};
pub use history::HistoryLog;
pub use media::{MediaKind, MediaReference};
pub use transcript::{ConversationTranscript, Speaker, TranscriptTurn};
