//! Analysis workflow state machine.
//!
//! Every analysis is started with [`AnalysisWorkflow::begin`], which hands out
//! a ticket. Completions are applied only if their ticket is still the current
//! one, so a call that finishes after the user reset or started another
//! analysis is dropped instead of overwriting newer state.

use serde::{Deserialize, Serialize};
use sitescout_core::analysis::AnalysisResult;
use sitescout_core::error::{Result, SiteScoutError};
use tracing::debug;
use uuid::Uuid;

/// Progress messages rotated while an analysis call is outstanding.
pub const STATUS_MESSAGES: [&str; 6] = [
    "Simulating web-head browsing...",
    "Mapping site hierarchy...",
    "Discovering public endpoints...",
    "Analyzing business logic patterns...",
    "Synthesizing structural requirements...",
    "Validating data grounding...",
];

/// Returns the progress message for the given tick.
pub fn status_message(tick: usize) -> &'static str {
    STATUS_MESSAGES[tick % STATUS_MESSAGES.len()]
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Idle,
    Crawling,
    Analyzing,
    Completed,
    Error,
}

impl AnalysisStatus {
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Crawling | Self::Analyzing)
    }
}

/// Identifies one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisTicket {
    id: Uuid,
    domain: String,
}

impl AnalysisTicket {
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisWorkflow {
    status: AnalysisStatus,
    current: Option<AnalysisTicket>,
    result: Option<AnalysisResult>,
    error: Option<String>,
}

impl AnalysisWorkflow {
    pub fn new() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            current: None,
            result: None,
            error: None,
        }
    }

    /// Starts a new analysis; rejected while another one is outstanding.
    pub fn begin(&mut self, domain: impl Into<String>) -> Result<AnalysisTicket> {
        if self.status.is_busy() {
            return Err(SiteScoutError::Busy);
        }

        let ticket = AnalysisTicket {
            id: Uuid::new_v4(),
            domain: domain.into(),
        };
        debug!(ticket = %ticket.id, domain = %ticket.domain, "Analysis started");

        self.status = AnalysisStatus::Crawling;
        self.current = Some(ticket.clone());
        self.result = None;
        self.error = None;
        Ok(ticket)
    }

    fn is_current(&self, ticket: &AnalysisTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Moves a crawling analysis to the analyzing phase.
    pub fn mark_analyzing(&mut self, ticket: &AnalysisTicket) -> bool {
        if !self.is_current(ticket) || self.status != AnalysisStatus::Crawling {
            return false;
        }
        self.status = AnalysisStatus::Analyzing;
        true
    }

    /// Applies the outcome of the call identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) when the ticket is stale.
    pub fn complete(&mut self, ticket: &AnalysisTicket, outcome: Result<AnalysisResult>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = %ticket.id, "Discarding result of a stale analysis");
            return false;
        }

        self.current = None;
        match outcome {
            Ok(result) => {
                self.status = AnalysisStatus::Completed;
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                self.status = AnalysisStatus::Error;
                self.result = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// Records a failure for `ticket`; same staleness rule as [`Self::complete`].
    pub fn fail(&mut self, ticket: &AnalysisTicket, error: SiteScoutError) -> bool {
        self.complete(ticket, Err(error))
    }

    /// Shows a previously completed result (e.g. from history).
    pub fn select(&mut self, result: AnalysisResult) {
        self.status = AnalysisStatus::Completed;
        self.current = None;
        self.result = Some(result);
        self.error = None;
    }

    /// Returns to idle; any outstanding call becomes stale.
    pub fn reset(&mut self) {
        self.status = AnalysisStatus::Idle;
        self.current = None;
        self.result = None;
        self.error = None;
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// User-facing error message of the last failed analysis.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for AnalysisWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
