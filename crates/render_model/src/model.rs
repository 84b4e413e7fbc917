//! The renderable projection of one diagnosis

use serde::{Deserialize, Serialize};

use repair_core::{DiagnosisResult, RepairStep};

use crate::markup::{tokenize, GuideSpan};
use crate::overlay::{project_annotation, OverlayBox, Viewport};

/// Everything the guide screen needs, in display-ready form.
///
/// A pure projection of a [`DiagnosisResult`]: no decisions are made here
/// and nothing is validated beyond the defensive clamping in the overlay
/// mapping. Steps are rendered exactly as received, even when ordinals
/// have gaps or duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub title: String,
    pub problem_description: String,
    pub root_cause: String,
    pub safety_warnings: Vec<String>,
    pub tools_needed: Vec<String>,
    pub steps: Vec<RepairStep>,
    pub guide: Vec<GuideSpan>,
    pub overlays: Vec<OverlayBox>,
    /// Data-URL preview of the source media the overlays sit on.
    pub preview: String,
}

impl RenderModel {
    /// Project a diagnosis onto the displayed image's dimensions.
    ///
    /// Overlapping annotations come out as independent overlays in
    /// response order; z-order is undefined.
    pub fn project(result: &DiagnosisResult, viewport: Viewport) -> Self {
        Self {
            title: result.title.clone(),
            problem_description: result.problem_description.clone(),
            root_cause: result.root_cause.clone(),
            safety_warnings: result.safety_warnings.clone(),
            tools_needed: result.tools_needed.clone(),
            steps: result.steps.clone(),
            guide: tokenize(&result.visual_guide),
            overlays: result
                .annotations
                .iter()
                .map(|annotation| project_annotation(annotation, viewport))
                .collect(),
            preview: result.source_media.preview().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::SpanKind;
    use chrono::Utc;
    use repair_core::{Annotation, BoundingBox, MediaReference};
    use uuid::Uuid;

    fn result() -> DiagnosisResult {
        DiagnosisResult {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: "Dripping faucet".to_string(),
            problem_description: "Drips when closed.".to_string(),
            root_cause: "Worn seal.".to_string(),
            safety_warnings: vec!["Shut off the water.".to_string()],
            tools_needed: vec!["Wrench".to_string()],
            steps: vec![
                RepairStep {
                    ordinal: 1,
                    instruction: "Shut off supply.".to_string(),
                    detail: String::new(),
                },
                // Ordinal gap arrives as-is from the source
                RepairStep {
                    ordinal: 3,
                    instruction: "Replace the cartridge.".to_string(),
                    detail: String::new(),
                },
            ],
            visual_guide: "Pry the [handle cap] and check the **cartridge**.".to_string(),
            annotations: vec![Annotation {
                label: "drip point".to_string(),
                bounds: BoundingBox {
                    y_min: 700,
                    x_min: 450,
                    y_max: 780,
                    x_max: 520,
                },
            }],
            source_media: MediaReference::new("QUJD", "image/jpeg", 3),
        }
    }

    #[test]
    fn test_projection_is_complete() {
        let viewport = Viewport {
            width: 1000.0,
            height: 1000.0,
        };
        let model = RenderModel::project(&result(), viewport);

        assert_eq!(model.title, "Dripping faucet");
        assert_eq!(model.overlays.len(), 1);
        assert_eq!(model.overlays[0].label, "drip point");
        assert_eq!(model.preview, "data:image/jpeg;base64,QUJD");

        let kinds: Vec<SpanKind> = model.guide.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SpanKind::Plain,
                SpanKind::Cue,
                SpanKind::Plain,
                SpanKind::Strong,
                SpanKind::Plain,
            ]
        );
    }

    #[test]
    fn test_steps_render_as_received() {
        let viewport = Viewport {
            width: 640.0,
            height: 480.0,
        };
        let model = RenderModel::project(&result(), viewport);

        let ordinals: Vec<u32> = model.steps.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![1, 3]);
    }
}
