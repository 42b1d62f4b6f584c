//! Follow-up conversation types.
//!
//! A conversation is scoped to one analysis: the log is created for a given
//! domain and is dropped together with it.

use crate::analysis::Source;
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
}

/// A single message in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Whether the answer required an additional grounded lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deep_dive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            is_deep_dive: None,
            sources: None,
        }
    }

    pub fn assistant(answer: FollowUpAnswer) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: answer.answer,
            is_deep_dive: Some(answer.is_deep_dive),
            sources: Some(answer.sources),
        }
    }

    /// Assistant message without grounding, used for local fallbacks.
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            is_deep_dive: None,
            sources: None,
        }
    }
}

/// The model's reply to a follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpAnswer {
    pub answer: String,
    pub is_deep_dive: bool,
    pub sources: Vec<Source>,
}

/// One user message paired with the assistant's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub question: ChatMessage,
    pub response: ChatMessage,
}

/// Append-only conversation log for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    exchanges: Vec<ChatExchange>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, exchange: ChatExchange) {
        self.exchanges.push(exchange);
    }

    pub fn exchanges(&self) -> &[ChatExchange] {
        &self.exchanges
    }

    /// Flattens the log into messages in conversation order.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.exchanges
            .iter()
            .flat_map(|exchange| [&exchange.question, &exchange.response])
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
