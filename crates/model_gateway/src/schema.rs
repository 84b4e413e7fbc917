//! Declared response schemas and strict parsing of model replies.
//!
//! Detection and diagnosis declare a JSON response schema with the request
//! and parse the reply against matching envelope types. Parsing is
//! all-or-nothing: a reply that fails extraction or validation fails the
//! whole call, never a partial result.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use repair_core::{
    Annotation, BoundingBox, DetectedItem, DiagnosisResult, MediaReference, RepairStep,
};

use crate::gateway::{GatewayError, Result};

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
struct DetectionEnvelope {
    items: Vec<DetectedItemPayload>,
}

#[derive(Debug, Deserialize)]
struct DetectedItemPayload {
    id: String,
    name: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosisEnvelope {
    title: String,
    problem_description: String,
    root_cause: String,
    safety_warnings: Vec<String>,
    tools_needed: Vec<String>,
    steps: Vec<StepPayload>,
    visual_guide_text: String,
    /// Defect localizations are sometimes omitted entirely; absent means
    /// no annotations, not an invalid reply.
    #[serde(default)]
    annotations: Vec<AnnotationPayload>,
}

#[derive(Debug, Deserialize)]
struct StepPayload {
    ordinal: u32,
    instruction: String,
    detail: String,
}

#[derive(Debug, Deserialize)]
struct AnnotationPayload {
    label: String,
    #[serde(rename = "box")]
    bounds: BoxPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxPayload {
    y_min: i64,
    x_min: i64,
    y_max: i64,
    x_max: i64,
}

// ============================================================================
// Declared request schemas
// ============================================================================

/// Schema declared with the detection request: `{items: [{id, name, description}]}`.
pub fn detection_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {"type": "STRING"},
                        "name": {"type": "STRING"},
                        "description": {"type": "STRING"}
                    },
                    "required": ["id", "name", "description"]
                }
            }
        },
        "required": ["items"]
    })
}

/// Schema declared with the diagnosis request, covering the full repair
/// guide including grid-normalized defect annotations.
pub fn diagnosis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "problemDescription": {"type": "STRING"},
            "rootCause": {"type": "STRING"},
            "safetyWarnings": {"type": "ARRAY", "items": {"type": "STRING"}},
            "toolsNeeded": {"type": "ARRAY", "items": {"type": "STRING"}},
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "ordinal": {"type": "INTEGER"},
                        "instruction": {"type": "STRING"},
                        "detail": {"type": "STRING"}
                    },
                    "required": ["ordinal", "instruction", "detail"]
                }
            },
            "visualGuideText": {"type": "STRING"},
            "annotations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": {"type": "STRING"},
                        "box": {
                            "type": "OBJECT",
                            "properties": {
                                "yMin": {"type": "INTEGER"},
                                "xMin": {"type": "INTEGER"},
                                "yMax": {"type": "INTEGER"},
                                "xMax": {"type": "INTEGER"}
                            },
                            "required": ["yMin", "xMin", "yMax", "xMax"]
                        }
                    },
                    "required": ["label", "box"]
                }
            }
        },
        "required": [
            "title", "problemDescription", "rootCause", "safetyWarnings",
            "toolsNeeded", "steps", "visualGuideText"
        ]
    })
}

// ============================================================================
// Reply parsing
// ============================================================================

/// Extract the JSON document from a model reply.
///
/// Extraction order:
/// 1. A ```json fenced block
/// 2. The outermost `{...}` object
/// 3. The reply as-is (strict parsing will then report the failure)
pub fn extract_json(response: &str) -> &str {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = response[start..].find("```") {
            return response[start..start + end_offset].trim();
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return &response[start..=end];
            }
        }
    }

    response.trim()
}

/// Parse a detection reply into the item list.
pub fn parse_detection(text: &str) -> Result<Vec<DetectedItem>> {
    let envelope: DetectionEnvelope = serde_json::from_str(extract_json(text))
        .map_err(|e| GatewayError::Schema(format!("detection response: {}", e)))?;

    Ok(envelope
        .items
        .into_iter()
        .map(|item| DetectedItem {
            id: item.id,
            name: item.name,
            description: item.description,
        })
        .collect())
}

/// Parse a diagnosis reply and stamp it into a [`DiagnosisResult`].
///
/// The id and timestamp are generated here, not supplied by the model; the
/// caller-provided media reference is attached for later rendering.
pub fn parse_diagnosis(text: &str, source_media: &MediaReference) -> Result<DiagnosisResult> {
    let envelope: DiagnosisEnvelope = serde_json::from_str(extract_json(text))
        .map_err(|e| GatewayError::Schema(format!("diagnosis response: {}", e)))?;

    Ok(DiagnosisResult {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        title: envelope.title,
        problem_description: envelope.problem_description,
        root_cause: envelope.root_cause,
        safety_warnings: envelope.safety_warnings,
        tools_needed: envelope.tools_needed,
        steps: envelope
            .steps
            .into_iter()
            .map(|step| RepairStep {
                ordinal: step.ordinal,
                instruction: step.instruction,
                detail: step.detail,
            })
            .collect(),
        visual_guide: envelope.visual_guide_text,
        annotations: envelope
            .annotations
            .into_iter()
            .map(|annotation| Annotation {
                label: annotation.label,
                bounds: BoundingBox {
                    y_min: annotation.bounds.y_min,
                    x_min: annotation.bounds.x_min,
                    y_max: annotation.bounds.y_max,
                    x_max: annotation.bounds.x_max,
                },
            })
            .collect(),
        source_media: source_media.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media() -> MediaReference {
        MediaReference::new("QUJD", "image/jpeg", 3)
    }

    const DIAGNOSIS_REPLY: &str = r#"{
        "title": "Dripping faucet",
        "problemDescription": "Water drips from the spout when closed.",
        "rootCause": "Worn cartridge seal.",
        "safetyWarnings": ["Shut off the water supply first."],
        "toolsNeeded": ["Adjustable wrench", "Replacement cartridge"],
        "steps": [
            {"ordinal": 1, "instruction": "Shut off supply valves.", "detail": "Under the sink."},
            {"ordinal": 2, "instruction": "Remove the handle.", "detail": "Pry off the cap screw."}
        ],
        "visualGuideText": "Look at the **cartridge** under the [handle cap].",
        "annotations": [
            {"label": "drip point", "box": {"yMin": 700, "xMin": 450, "yMax": 780, "xMax": 520}}
        ]
    }"#;

    #[test]
    fn test_extract_json_fenced_block() {
        let reply = "Here you go:\n```json\n{\"items\": []}\n```\nDone.";
        assert_eq!(extract_json(reply), "{\"items\": []}");
    }

    #[test]
    fn test_extract_json_raw_object() {
        let reply = "noise {\"items\": []} trailing";
        assert_eq!(extract_json(reply), "{\"items\": []}");
    }

    #[test]
    fn test_parse_detection_happy_path() {
        let reply = r#"{"items": [
            {"id": "1", "name": "Faucet", "description": "dripping"},
            {"id": "2", "name": "Drain", "description": "slow to empty"}
        ]}"#;
        let items = parse_detection(reply).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Faucet");
        assert_eq!(items[1].focus_context(), "Drain - slow to empty");
    }

    #[test]
    fn test_parse_detection_missing_field_fails_whole_call() {
        // "description" absent from one entry: no partial list comes back
        let reply = r#"{"items": [{"id": "1", "name": "Faucet"}]}"#;
        let err = parse_detection(reply).unwrap_err();
        assert!(matches!(err, GatewayError::Schema(_)));
    }

    #[test]
    fn test_parse_detection_empty_list_is_valid() {
        let items = parse_detection(r#"{"items": []}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_diagnosis_stamps_identity() {
        let first = parse_diagnosis(DIAGNOSIS_REPLY, &media()).unwrap();
        let second = parse_diagnosis(DIAGNOSIS_REPLY, &media()).unwrap();

        assert_eq!(first.title, "Dripping faucet");
        assert_eq!(first.steps.len(), 2);
        assert_eq!(first.steps[1].ordinal, 2);
        assert_eq!(first.annotations[0].bounds.y_min, 700);
        assert_eq!(first.source_media.mime_type(), "image/jpeg");
        // Fresh identifier per parse, never taken from the reply
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_parse_diagnosis_tolerates_missing_annotations() {
        let reply = r#"{
            "title": "t", "problemDescription": "p", "rootCause": "r",
            "safetyWarnings": [], "toolsNeeded": [],
            "steps": [], "visualGuideText": "g"
        }"#;
        let result = parse_diagnosis(reply, &media()).unwrap();
        assert!(result.annotations.is_empty());
    }

    #[test]
    fn test_parse_diagnosis_missing_required_field() {
        let reply = r#"{"title": "only a title"}"#;
        let err = parse_diagnosis(reply, &media()).unwrap_err();
        assert!(matches!(err, GatewayError::Schema(_)));
    }

    #[test]
    fn test_schemas_mark_required_fields() {
        let detection = detection_response_schema();
        assert_eq!(detection["required"][0], "items");

        let diagnosis = diagnosis_response_schema();
        let required: Vec<&str> = diagnosis["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"steps"));
        assert!(required.contains(&"visualGuideText"));
    }
}
