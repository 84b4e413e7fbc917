//! Gemini `generateContent` implementation of the gateway

use async_trait::async_trait;
use reqwest::Client;

use repair_core::{ConversationTranscript, DetectedItem, DiagnosisResult, MediaReference};

use crate::config::GatewayConfig;
use crate::gateway::{GatewayError, ModelGateway, Result};
use crate::prompts;
use crate::protocol::{
    first_text, transcript_contents, GeminiContent, GeminiRequest, GeminiResponse,
    GenerationConfig,
};
use crate::schema;

/// Gateway backed by the Gemini API.
pub struct GeminiGateway {
    client: Client,
    config: GatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Construct with the credential from the process environment.
    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    /// Set a custom base URL (e.g., for proxies or test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// One request/response exchange; returns the reply text.
    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        let api_key = self.config.require_key()?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(GatewayError::Http)?;
            log::warn!("model call failed: HTTP {}: {}", status, message);
            return Err(GatewayError::Api { status, message });
        }

        let body: GeminiResponse = response.json().await.map_err(GatewayError::Http)?;
        first_text(&body).ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn detect_items(&self, media: &MediaReference) -> Result<Vec<DetectedItem>> {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user_with_media(
                prompts::DETECTION_INSTRUCTION,
                media,
            )],
            system_instruction: None,
            generation_config: Some(GenerationConfig::structured(
                schema::detection_response_schema(),
            )),
        };

        let text = self.generate(&request).await?;
        let items = schema::parse_detection(&text)?;
        log::debug!("detection returned {} item(s)", items.len());
        Ok(items)
    }

    async fn analyze(
        &self,
        media: &MediaReference,
        focus: Option<&str>,
    ) -> Result<DiagnosisResult> {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user_with_media(
                prompts::diagnosis_prompt(focus),
                media,
            )],
            system_instruction: Some(GeminiContent::system(prompts::DIAGNOSIS_PERSONA)),
            generation_config: Some(GenerationConfig::structured(
                schema::diagnosis_response_schema(),
            )),
        };

        let text = self.generate(&request).await?;
        schema::parse_diagnosis(&text, media)
    }

    async fn repair_chat(
        &self,
        context: &DiagnosisResult,
        transcript: &ConversationTranscript,
        message: &str,
    ) -> Result<String> {
        let request = GeminiRequest {
            contents: transcript_contents(transcript, message),
            system_instruction: Some(GeminiContent::system(prompts::repair_chat_instruction(
                context,
            ))),
            generation_config: Some(GenerationConfig::conversational()),
        };

        self.generate(&request).await
    }

    async fn support_chat(
        &self,
        transcript: &ConversationTranscript,
        message: &str,
    ) -> Result<String> {
        let request = GeminiRequest {
            contents: transcript_contents(transcript, message),
            system_instruction: Some(GeminiContent::system(prompts::SUPPORT_PERSONA)),
            generation_config: Some(GenerationConfig::conversational()),
        };

        self.generate(&request).await
    }
}
