//! Secret management service trait.
//!
//! Defines the interface for loading the Gemini API key.

use crate::config::SecretConfig;
use crate::error::{Result, SiteScoutError};

/// Message shown when no credential is available.
pub const MISSING_API_KEY_MESSAGE: &str =
    "Gemini API key not found. Intelligence functions will be unavailable.";

/// Service for loading secret configuration.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Resolves the API key or fails with a configuration error.
    async fn require_api_key(&self) -> Result<String> {
        let secrets = self.load_secrets().await?;
        secrets
            .gemini_api_key()
            .map(str::to_string)
            .ok_or_else(|| SiteScoutError::configuration(MISSING_API_KEY_MESSAGE))
    }
}
