//! Error types for SiteScout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing message for a response that failed schema validation.
pub const INGESTION_FAILED_MESSAGE: &str =
    "Intelligence synthesis failed. The model output was non-compliant with the schema.";

/// Fallback message when a remote call fails without a usable message.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "An unexpected error occurred during crawling.";

/// Assistant reply appended to the chat log when a follow-up turn fails.
pub const CHAT_FALLBACK_MESSAGE: &str =
    "Sorry, I encountered an error while deep-diving into the site.";

/// A shared error type for the entire SiteScout workspace.
///
/// The `Display` output of each variant is safe to show to an end user.
/// Technical detail that must not reach the user (parser errors, raw HTTP
/// bodies) is kept in dedicated fields and only ever logged.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SiteScoutError {
    /// Required credential or configuration is missing
    #[error("{0}")]
    Configuration(String),

    /// The model answered, but the payload is not schema-compliant after sanitization
    #[error("{}", INGESTION_FAILED_MESSAGE)]
    Ingestion { detail: String },

    /// The remote call itself failed (network, quota, remote-side fault)
    #[error("{}", transport_message(.message))]
    Transport {
        message: Option<String>,
        status_code: Option<u16>,
    },

    /// A follow-up chat call failed
    #[error("Follow-up failed: {0}")]
    ChatTurn(String),

    /// User input rejected before any call is made
    #[error("{0}")]
    InvalidInput(String),

    /// An operation is already outstanding
    #[error("A request is already in progress")]
    Busy,

    /// Entity not found error with type information
    #[error("{entity_type} not found: '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SiteScoutError {
    /// Creates a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an Ingestion error carrying the parser detail for logs
    pub fn ingestion(detail: impl Into<String>) -> Self {
        Self::Ingestion {
            detail: detail.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Transport {
            message: Some(message.into()),
            status_code,
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_ingestion(&self) -> bool {
        matches!(self, Self::Ingestion { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Technical detail suitable for logs, never for display.
    pub fn log_detail(&self) -> String {
        match self {
            Self::Ingestion { detail } => detail.clone(),
            Self::Transport {
                message,
                status_code,
            } => format!(
                "status={} message={}",
                status_code.map_or_else(|| "none".to_string(), |c| c.to_string()),
                message.as_deref().unwrap_or("<none>")
            ),
            other => other.to_string(),
        }
    }
}

fn transport_message(message: &Option<String>) -> &str {
    match message.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => TRANSPORT_FALLBACK_MESSAGE,
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SiteScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SiteScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SiteScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for SiteScoutError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(format!("prompt template error: {err}"))
    }
}

impl From<anyhow::Error> for SiteScoutError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, SiteScoutError>`.
pub type Result<T> = std::result::Result<T, SiteScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_display_hides_parser_detail() {
        let err = SiteScoutError::ingestion("expected value at line 1 column 1");
        assert_eq!(err.to_string(), INGESTION_FAILED_MESSAGE);
        assert!(err.log_detail().contains("line 1 column 1"));
    }

    #[test]
    fn test_transport_display_uses_message() {
        let err = SiteScoutError::transport("RESOURCE_EXHAUSTED: quota", Some(429));
        assert_eq!(err.to_string(), "RESOURCE_EXHAUSTED: quota");
    }

    #[test]
    fn test_transport_display_falls_back() {
        let err = SiteScoutError::Transport {
            message: None,
            status_code: None,
        };
        assert_eq!(err.to_string(), TRANSPORT_FALLBACK_MESSAGE);

        let blank = SiteScoutError::Transport {
            message: Some("  ".to_string()),
            status_code: Some(500),
        };
        assert_eq!(blank.to_string(), TRANSPORT_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SiteScoutError = io.into();
        assert!(matches!(err, SiteScoutError::Io { .. }));
    }
}
