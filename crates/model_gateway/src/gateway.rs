//! Gateway trait and error taxonomy

use async_trait::async_trait;
use thiserror::Error;

use repair_core::{ConversationTranscript, DetectedItem, DiagnosisResult, MediaReference};

/// Failure modes of a gateway operation.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The required service credential is absent. Fails the specific
    /// operation; never a crash of the wider system.
    #[error("missing service credential: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response arrived but did not conform to the declared schema.
    #[error("schema validation failed: {0}")]
    Schema(String),

    /// Structurally valid reply with no usable content.
    #[error("empty response from model")]
    EmptyResponse,
}

impl GatewayError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// The four operations the app performs against the model service.
///
/// Each call is a single request/response exchange, blocking from the
/// caller's perspective. No operation partially applies: a malformed
/// response is never coerced into a partial result.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Enumerate distinct repairable objects/scenarios in the media.
    async fn detect_items(&self, media: &MediaReference) -> Result<Vec<DetectedItem>>;

    /// Produce the full repair guide, optionally narrowed to one detected
    /// item via `focus`. The returned result carries a freshly stamped id
    /// and timestamp plus the caller's media reference.
    async fn analyze(&self, media: &MediaReference, focus: Option<&str>)
        -> Result<DiagnosisResult>;

    /// Follow-up question scoped to the active diagnosis.
    async fn repair_chat(
        &self,
        context: &DiagnosisResult,
        transcript: &ConversationTranscript,
        message: &str,
    ) -> Result<String>;

    /// App-usage question, independent of any diagnosis.
    async fn support_chat(
        &self,
        transcript: &ConversationTranscript,
        message: &str,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_detection() {
        let err = GatewayError::Configuration("GEMINI_API_KEY is not set".to_string());
        assert!(err.is_configuration());

        let err = GatewayError::EmptyResponse;
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_api_error_display() {
        let err = GatewayError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error: HTTP 503: overloaded");
    }
}
