pub mod analysis;
pub mod chat;
pub mod config;
pub mod domain;
pub mod error;
pub mod generation;
pub mod grounding;
pub mod history;
pub mod ingest;
pub mod prompt;
pub mod secret;
pub mod storage;

// Re-export common error type
pub use error::SiteScoutError;

pub use analysis::{AnalysisDraft, AnalysisResult, Requirements, SitePage, Source};
pub use generation::{GenerationRequest, GenerationResponse, GenerationService};
pub use history::{HistoryEntry, SessionCache};
