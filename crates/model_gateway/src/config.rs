//! Gateway configuration sourced from the process environment

use crate::gateway::{GatewayError, Result};

/// Environment variable holding the service credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the model service.
///
/// A missing credential is not an error at construction time; each
/// operation that needs it fails with [`GatewayError::Configuration`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Read the credential from the process environment. Blank values are
    /// treated as absent.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The credential, or the per-call configuration failure.
    pub fn require_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Configuration(format!("{} is not set", API_KEY_ENV)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_require_key_missing() {
        let config = GatewayConfig::default();
        let err = config.require_key().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_require_key_present() {
        let config = GatewayConfig::default().with_api_key("test-key");
        assert_eq!(config.require_key().unwrap(), "test-key");
    }
}
