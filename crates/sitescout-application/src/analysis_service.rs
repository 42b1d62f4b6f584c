//! Analysis use case.
//!
//! Runs the full pipeline for one domain: prompt and schema construction,
//! the schema-constrained grounded call, ingestion, source extraction, and the
//! history update.

use crate::history_service::HistoryService;
use sitescout_core::analysis::AnalysisResult;
use sitescout_core::config::AppConfig;
use sitescout_core::domain::normalize_domain;
use sitescout_core::error::{Result, SiteScoutError};
use sitescout_core::generation::{GenerationRequest, GenerationService};
use sitescout_core::grounding::extract_sources;
use sitescout_core::history::HistoryEntry;
use sitescout_core::ingest::ingest;
use sitescout_core::prompt::{analysis_prompt, analysis_schema};
use std::sync::Arc;
use tracing::{error, info};

/// Where a returned analysis came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Freshly produced by the remote model and just recorded.
    Fresh(HistoryEntry),
    /// Served from the history without a remote call.
    Cached(HistoryEntry),
}

impl AnalysisOutcome {
    pub fn entry(&self) -> &HistoryEntry {
        match self {
            Self::Fresh(entry) | Self::Cached(entry) => entry,
        }
    }

    pub fn into_entry(self) -> HistoryEntry {
        match self {
            Self::Fresh(entry) | Self::Cached(entry) => entry,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.entry().data
    }

    /// The normalized domain that was requested.
    pub fn domain(&self) -> &str {
        &self.entry().domain
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

pub struct AnalysisService {
    generator: Arc<dyn GenerationService>,
    history: Arc<HistoryService>,
    config: AppConfig,
}

impl AnalysisService {
    pub fn new(
        generator: Arc<dyn GenerationService>,
        history: Arc<HistoryService>,
        config: AppConfig,
    ) -> Self {
        Self {
            generator,
            history,
            config,
        }
    }

    pub fn generator(&self) -> Arc<dyn GenerationService> {
        Arc::clone(&self.generator)
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Normalizes the input and returns the cached analysis when one exists,
    /// unless `fresh` forces a new remote call.
    ///
    /// Nothing is recorded when any step of a fresh analysis fails.
    pub async fn analyze(&self, input: &str, fresh: bool) -> Result<AnalysisOutcome> {
        let domain = normalize_domain(input)
            .ok_or_else(|| SiteScoutError::invalid_input("Please enter a website domain."))?;

        if !fresh
            && let Some(entry) = self.history.find(&domain).await
        {
            info!(%domain, entry_id = %entry.id, "Using cached analysis");
            return Ok(AnalysisOutcome::Cached(entry));
        }

        let result = self.run_analysis(&domain).await?;
        Ok(AnalysisOutcome::Fresh(self.history.record(&domain, result).await))
    }

    async fn run_analysis(&self, domain: &str) -> Result<AnalysisResult> {
        info!(%domain, model = %self.config.analysis_model, "Starting analysis");

        let request = GenerationRequest::new(&self.config.analysis_model, analysis_prompt(domain)?)
            .with_search()
            .with_schema(analysis_schema());

        let response = self.generator.generate(request).await.inspect_err(|err| {
            error!(%domain, detail = %err.log_detail(), "Analysis call failed");
        })?;

        let raw = response.text.unwrap_or_default();
        let draft = ingest(&raw)?;
        let result = draft.with_sources(extract_sources(&response.grounding));

        info!(
            %domain,
            pages = result.structure().len(),
            sources = result.sources().len(),
            "Analysis completed"
        );
        Ok(result)
    }
}
