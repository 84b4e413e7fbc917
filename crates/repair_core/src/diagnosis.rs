//! Detection and diagnosis results produced by the model service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaReference;

/// Side length of the normalized annotation grid. Bounding boxes are
/// expressed on this fixed grid regardless of source media resolution.
pub const GRID_SIZE: i64 = 1000;

/// One repairable object or scenario enumerated by the detection call.
///
/// Ephemeral: cleared on reset or when a new capture replaces the media.
/// The set is semantically unordered but rendered in response order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedItem {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl DetectedItem {
    /// Focus string passed to a diagnosis scoped to this item.
    pub fn focus_context(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

/// One step of a repair guide.
///
/// Ordinals should form a contiguous ascending sequence starting at 1,
/// but gaps and duplicates from the external source are rendered as
/// received rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairStep {
    pub ordinal: u32,
    pub instruction: String,
    pub detail: String,
}

/// A bounding box on the fixed normalized grid.
///
/// `y_min <= y_max` and `x_min <= x_max` are expected but not guaranteed
/// by the external source; consumers clamp and reorder defensively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub y_min: i64,
    pub x_min: i64,
    pub y_max: i64,
    pub x_max: i64,
}

/// A labeled defect location within the source media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub label: String,
    #[serde(rename = "box")]
    pub bounds: BoundingBox,
}

/// The full structured output of one diagnosis call.
///
/// `id` and `created_at` are stamped locally at creation time, never taken
/// from the model. Immutable after creation; shared by reference between
/// the session, the history log, and presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub problem_description: String,
    pub root_cause: String,
    pub safety_warnings: Vec<String>,
    pub tools_needed: Vec<String>,
    pub steps: Vec<RepairStep>,
    pub visual_guide: String,
    pub annotations: Vec<Annotation>,
    pub source_media: MediaReference,
}
