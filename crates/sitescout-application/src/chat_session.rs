//! Follow-up chat about one completed analysis.
//!
//! A turn is started with [`ChatSession::begin_turn`] and finished with
//! [`ChatSession::complete_turn`]; the pending turn carries the session id, so
//! a reply can only land in the conversation that asked for it. Failures are
//! contained to the turn: a fallback assistant message is appended and the
//! session stays usable.
//!
//! Prompts name the domain the user asked about, which is also the history
//! key, rather than the `url` echoed in the analysis.

use sitescout_core::analysis::AnalysisResult;
use sitescout_core::chat::{ChatExchange, ChatLog, ChatMessage, FollowUpAnswer};
use sitescout_core::error::{CHAT_FALLBACK_MESSAGE, Result, SiteScoutError};
use sitescout_core::generation::{GenerationRequest, GenerationService};
use sitescout_core::grounding::extract_follow_up;
use sitescout_core::prompt::follow_up_prompt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Answer used when the model returns no text.
pub const EMPTY_ANSWER_MESSAGE: &str = "I couldn't find more information on that.";

/// Asks one follow-up question about the analysis of `domain`.
pub async fn ask_follow_up(
    generator: &dyn GenerationService,
    model: &str,
    domain: &str,
    analysis: &AnalysisResult,
    question: &str,
) -> Result<FollowUpAnswer> {
    let prompt = follow_up_prompt(domain, analysis, question)?;
    let request = GenerationRequest::new(model, prompt).with_search();

    let response = generator
        .generate(request)
        .await
        .map_err(|err| SiteScoutError::ChatTurn(err.log_detail()))?;

    let answer = response
        .text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| EMPTY_ANSWER_MESSAGE.to_string());
    let (sources, is_deep_dive) = extract_follow_up(&response.grounding);

    debug!(is_deep_dive, sources = sources.len(), "Follow-up answered");
    Ok(FollowUpAnswer {
        answer,
        is_deep_dive,
        sources,
    })
}

/// A question that has been submitted but not answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    session_id: Uuid,
    question: String,
}

impl PendingTurn {
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Clears the pending flag if an in-flight [`ChatSession::ask`] is dropped.
struct PendingReset<'a>(&'a mut bool);

impl Drop for PendingReset<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct ChatSession {
    id: Uuid,
    domain: String,
    analysis: Arc<AnalysisResult>,
    log: ChatLog,
    pending: bool,
    generator: Arc<dyn GenerationService>,
    model: String,
}

impl ChatSession {
    pub fn new(
        domain: impl Into<String>,
        analysis: Arc<AnalysisResult>,
        generator: Arc<dyn GenerationService>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain: domain.into(),
            analysis,
            log: ChatLog::new(),
            pending: false,
            generator,
            model: model.into(),
        }
    }

    /// The requested domain this conversation is about.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Registers a question; rejects blank input and a second question while
    /// one is outstanding.
    pub fn begin_turn(&mut self, question: &str) -> Result<PendingTurn> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SiteScoutError::invalid_input("Please enter a question."));
        }
        if self.pending {
            return Err(SiteScoutError::Busy);
        }
        self.pending = true;
        Ok(PendingTurn {
            session_id: self.id,
            question: question.to_string(),
        })
    }

    /// Appends the exchange for `turn`.
    ///
    /// Returns `None` if the turn belongs to another session. A failed outcome
    /// is replaced by the fallback assistant message.
    pub fn complete_turn(
        &mut self,
        turn: PendingTurn,
        outcome: Result<FollowUpAnswer>,
    ) -> Option<&ChatExchange> {
        if turn.session_id != self.id {
            debug!("Discarding follow-up answer for another session");
            return None;
        }
        self.pending = false;

        let response = match outcome {
            Ok(answer) => ChatMessage::assistant(answer),
            Err(err) => {
                warn!(detail = %err.log_detail(), "Follow-up failed");
                ChatMessage::assistant_text(CHAT_FALLBACK_MESSAGE)
            }
        };

        self.log.push(ChatExchange {
            question: ChatMessage::user(turn.question),
            response,
        });
        self.log.exchanges().last()
    }

    /// Runs a full turn against the session's generator.
    ///
    /// Dropping the returned future abandons the turn: nothing is appended and
    /// the session accepts the next question.
    pub async fn ask(&mut self, question: &str) -> Result<ChatExchange> {
        let turn = self.begin_turn(question)?;
        let reset = PendingReset(&mut self.pending);
        let outcome = ask_follow_up(
            self.generator.as_ref(),
            &self.model,
            &self.domain,
            &self.analysis,
            turn.question(),
        )
        .await;
        drop(reset);

        self.complete_turn(turn, outcome)
            .cloned()
            .ok_or_else(|| SiteScoutError::internal("follow-up turn was not recorded"))
    }
}
