//! Site analysis domain model.
//!
//! The wire names (`url`, `howItWorks`, `userExperience`) are those of the
//! JSON object the model is asked to return; Rust-side names follow the
//! report vocabulary.

use serde::{Deserialize, Serialize};

/// Requirement lists grouped by concern.
///
/// Every list must be present in a model response; any of them may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub functional: Vec<String>,
    pub technical: Vec<String>,
    pub user_experience: Vec<String>,
}

/// A discovered site section, kept in crawl order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePage {
    pub page: String,
    pub description: String,
}

/// A grounding citation. `uri` is never empty once it reaches a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Model output parsed and sanitized, but not yet joined with its sources.
///
/// The only way to turn a draft into an [`AnalysisResult`] is
/// [`AnalysisDraft::with_sources`], so callers never observe a result whose
/// grounding has not been attached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisDraft {
    #[serde(rename = "url")]
    domain: String,
    summary: String,
    purpose: String,
    #[serde(rename = "howItWorks")]
    operational_flow: String,
    requirements: Requirements,
    structure: Vec<SitePage>,
}

impl AnalysisDraft {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Completes the draft with the citations extracted from grounding metadata.
    pub fn with_sources(self, sources: Vec<Source>) -> AnalysisResult {
        AnalysisResult {
            domain: self.domain,
            summary: self.summary,
            purpose: self.purpose,
            operational_flow: self.operational_flow,
            requirements: self.requirements,
            structure: self.structure,
            sources,
        }
    }
}

/// One completed site analysis.
///
/// Fields are private: a result is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "url")]
    domain: String,
    summary: String,
    purpose: String,
    #[serde(rename = "howItWorks")]
    operational_flow: String,
    requirements: Requirements,
    structure: Vec<SitePage>,
    #[serde(default)]
    sources: Vec<Source>,
}

impl AnalysisResult {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn operational_flow(&self) -> &str {
        &self.operational_flow
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn structure(&self) -> &[SitePage] {
        &self.structure
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }
}
