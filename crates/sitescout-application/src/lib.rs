pub mod analysis_service;
pub mod chat_session;
pub mod history_service;
pub mod workflow;

pub use analysis_service::{AnalysisOutcome, AnalysisService};
pub use chat_session::{ChatSession, PendingTurn, ask_follow_up};
pub use history_service::HistoryService;
pub use workflow::{AnalysisStatus, AnalysisTicket, AnalysisWorkflow};
