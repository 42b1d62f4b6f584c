//! Wiring of configuration, storage and the Gemini client.

use anyhow::{Context, Result};
use sitescout_application::{AnalysisService, HistoryService};
use sitescout_core::config::AppConfig;
use sitescout_core::secret::SecretService;
use sitescout_infrastructure::{
    ConfigService, FileKeyValueStore, SecretServiceImpl, SiteScoutPaths,
};
use sitescout_interaction::GeminiApiClient;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct AppContext {
    pub paths: SiteScoutPaths,
    pub config: AppConfig,
    pub store: Arc<FileKeyValueStore>,
}

impl AppContext {
    /// Resolves directories and reads `config.toml`. No credentials needed.
    pub fn load(config_dir: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let paths = SiteScoutPaths::resolve(config_dir, data_dir)?;
        let config = ConfigService::new(paths.config_file())
            .get_config()
            .with_context(|| format!("Failed to load {}", paths.config_file().display()))?;
        let store = Arc::new(FileKeyValueStore::new(paths.store_dir()));

        tracing::debug!(
            config_dir = %paths.config_dir().display(),
            data_dir = %paths.data_dir().display(),
            "Paths resolved"
        );

        Ok(Self {
            paths,
            config,
            store,
        })
    }

    /// Builds the analysis service; fails when no API key is configured.
    pub async fn analysis_service(&self) -> Result<AnalysisService> {
        let secret_file = SecretServiceImpl::ensure_secret_file(&self.paths.secret_file())?;
        let secrets = SecretServiceImpl::new(&secret_file);

        let api_key = secrets.require_api_key().await.with_context(|| {
            format!(
                "Set GEMINI_API_KEY or add the key to {}",
                secret_file.display()
            )
        })?;

        let mut config = self.config.clone();
        if let Some(model) = secrets
            .load_secrets()
            .await?
            .gemini
            .and_then(|gemini| gemini.model_name)
            .filter(|model| !model.trim().is_empty())
        {
            tracing::debug!(%model, "Analysis model overridden by secret.json");
            config.analysis_model = model;
        }

        let client = GeminiApiClient::new(
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(AnalysisService::new(
            Arc::new(client),
            Arc::new(self.history_service()),
            config,
        ))
    }

    /// The persisted history, without a remote client.
    pub fn history_service(&self) -> HistoryService {
        HistoryService::new(self.store.clone(), self.config.history_limit)
    }
}
