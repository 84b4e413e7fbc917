//! Gemini `generateContent` wire format.
//!
//! The API has a unique shape:
//! - Messages are called "contents"
//! - Role is "user" or "model" (not "assistant")
//! - Content is an array of "parts"; media travels as inline base64 data
//! - System instructions are separate from messages
//!
//! # Example request
//! ```json
//! {
//!   "contents": [
//!     {"role": "user", "parts": [{"text": "What is broken here?"},
//!                                {"inline_data": {"mime_type": "image/jpeg", "data": "..."}}]}
//!   ],
//!   "system_instruction": {"role": "system", "parts": [{"text": "You are a repair expert"}]},
//!   "generationConfig": {"temperature": 0.1, "responseMimeType": "application/json"}
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use repair_core::{ConversationTranscript, MediaReference, Speaker};

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest {
    /// Conversation history plus the current submission.
    pub contents: Vec<GeminiContent>,
    /// Persona/system instructions, separate from the contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    /// "user" or "model" (not "assistant").
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerationConfig {
    /// Config for a call that must return a JSON document conforming to
    /// the declared schema.
    pub fn structured(schema: Value) -> Self {
        Self {
            temperature: 0.1,
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        }
    }

    /// Config for a free-text conversational reply.
    pub fn conversational() -> Self {
        Self {
            temperature: 0.7,
            response_mime_type: None,
            response_schema: None,
        }
    }
}

impl GeminiContent {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart::Text { text: text.into() }],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![GeminiPart::Text { text: text.into() }],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![GeminiPart::Text { text: text.into() }],
        }
    }

    /// A user turn carrying an instruction plus the media payload.
    pub fn user_with_media(text: impl Into<String>, media: &MediaReference) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![
                GeminiPart::Text { text: text.into() },
                GeminiPart::InlineData {
                    inline_data: InlineData {
                        mime_type: media.mime_type().to_string(),
                        data: media.payload().to_string(),
                    },
                },
            ],
        }
    }
}

/// Transcript-so-far plus the new user message, as alternating contents.
pub fn transcript_contents(
    transcript: &ConversationTranscript,
    new_message: &str,
) -> Vec<GeminiContent> {
    let mut contents: Vec<GeminiContent> = transcript
        .turns()
        .iter()
        .map(|turn| match turn.speaker {
            Speaker::User => GeminiContent::user_text(turn.text.clone()),
            Speaker::Assistant => GeminiContent::model_text(turn.text.clone()),
        })
        .collect();
    contents.push(GeminiContent::user_text(new_message));
    contents
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiResponseContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponsePart {
    pub text: String,
}

/// Text of the first candidate part, if any.
pub fn first_text(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .map(|part| part.text.clone())
}
