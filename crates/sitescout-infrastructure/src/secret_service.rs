//! Secret service implementation.
//!
//! Resolves the Gemini API key from the environment first (`GEMINI_API_KEY`,
//! then `API_KEY`) and falls back to `secret.json`.

use sitescout_core::config::{GeminiConfig, SecretConfig};
use sitescout_core::error::{Result, SiteScoutError};
use sitescout_core::secret::SecretService;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variables checked for an API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    read_env: bool,
}

impl SecretServiceImpl {
    pub fn new(secret_file: impl Into<PathBuf>) -> Self {
        Self {
            path: secret_file.into(),
            read_env: true,
        }
    }

    /// Ignores environment variables and reads only the file.
    pub fn file_only(mut self) -> Self {
        self.read_env = false;
        self
    }

    fn env_api_key() -> Option<String> {
        API_KEY_ENV_VARS.iter().find_map(|name| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .inspect(|_| debug!(source = *name, "Using API key from environment"))
        })
    }

    /// Parses the secret file; `None` when it does not exist.
    fn read_file(&self) -> Result<Option<SecretConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map(Some).map_err(|err| {
            SiteScoutError::configuration(format!(
                "Invalid secret file {}: {err}",
                self.path.display()
            ))
        })
    }

    /// Creates `secret.json` with an empty template if it does not exist.
    ///
    /// Sets permissions to 600 on Unix.
    pub fn ensure_secret_file(path: &Path) -> Result<PathBuf> {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: None,
            }),
        };
        std::fs::write(path, serde_json::to_string_pretty(&template)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(path.to_path_buf())
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        let from_file = self.read_file()?.unwrap_or_default();

        if !self.read_env {
            return Ok(from_file);
        }

        match Self::env_api_key() {
            Some(api_key) => {
                let model_name = from_file.gemini.and_then(|gemini| gemini.model_name);
                Ok(SecretConfig {
                    gemini: Some(GeminiConfig {
                        api_key,
                        model_name,
                    }),
                })
            }
            None => Ok(from_file),
        }
    }
}
