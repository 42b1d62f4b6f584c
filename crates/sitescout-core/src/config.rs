//! Configuration models.
//!
//! Secrets (`secret.json`) and tunables (`config.toml`) are stored separately;
//! loading lives in `sitescout-infrastructure`.

use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

/// Gemini API credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Contents of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

impl SecretConfig {
    /// The configured API key, if present and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|gemini| gemini.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}

/// Contents of `config.toml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model used for the schema-constrained analysis call
    pub analysis_model: String,
    /// Model used for follow-up questions
    pub chat_model: String,
    /// Number of analyses kept in the history
    pub history_limit: usize,
    /// Per-request timeout for remote calls
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("chat_model = \"gemini-2.5-flash\"").unwrap();
        assert_eq!(config.chat_model, "gemini-2.5-flash");
        assert_eq!(config.analysis_model, DEFAULT_ANALYSIS_MODEL);
        assert_eq!(config.history_limit, 15);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "  ".to_string(),
                model_name: None,
            }),
        };
        assert!(config.gemini_api_key().is_none());
        assert!(SecretConfig::default().gemini_api_key().is_none());
    }
}
