//! Ingestion of raw analysis payloads.
//!
//! Model output is untrusted even when a response schema was requested: it may
//! arrive wrapped in a Markdown fence, carry `[n]` citation markers inside
//! string values, be empty, or be malformed. [`ingest`] turns it into an
//! [`AnalysisDraft`] or fails with [`SiteScoutError::Ingestion`].

use crate::analysis::AnalysisDraft;
use crate::error::{Result, SiteScoutError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::{debug, error};

static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*```[A-Za-z0-9_+-]*[ \t]*(?:\r?\n)?").expect("leading fence pattern is valid")
});

static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\r?\n)?[ \t]*```\s*$").expect("trailing fence pattern is valid")
});

static CITATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[0-9]+\]").expect("citation pattern is valid"));

/// Removes a Markdown code fence around the payload, if it starts with one.
pub fn strip_code_fence(text: &str) -> Cow<'_, str> {
    let Some(leading) = LEADING_FENCE.find(text) else {
        return Cow::Borrowed(text);
    };
    let body = &text[leading.end()..];
    match TRAILING_FENCE.find(body) {
        Some(trailing) => Cow::Owned(body[..trailing.start()].to_string()),
        None => Cow::Owned(body.to_string()),
    }
}

/// Removes every `[<digits>]` citation marker from the text.
///
/// Only ASCII digits form a marker; `[３]` or `[٣]` are content.
pub fn strip_citations(text: &str) -> Cow<'_, str> {
    CITATION_MARKER.replace_all(text, "")
}

fn sanitize_once(text: &str) -> String {
    let unfenced = strip_code_fence(text);
    strip_citations(&unfenced).into_owned()
}

/// Fence and citation cleanup, repeated until the text stops changing.
///
/// A single pass is not enough for inputs such as `[[1]2]`, where removing
/// one marker exposes another. Iterating to a fixed point makes the function
/// idempotent. Each productive pass shortens the text, so the loop terminates.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Sanitizes and parses a raw analysis payload.
///
/// Sources are not part of the payload; the returned draft must be completed
/// with the grounding citations before it becomes a result.
pub fn ingest(raw: &str) -> Result<AnalysisDraft> {
    let cleaned = sanitize(raw);
    if cleaned.trim().is_empty() {
        error!("Analysis payload is empty after sanitization");
        return Err(SiteScoutError::ingestion("empty payload"));
    }

    match serde_json::from_str::<AnalysisDraft>(&cleaned) {
        Ok(draft) => {
            debug!(domain = %draft.domain(), "Analysis payload parsed");
            Ok(draft)
        }
        Err(err) => {
            error!(error = %err, payload_len = cleaned.len(), "Analysis payload is not schema-compliant");
            Err(SiteScoutError::ingestion(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INGESTION_FAILED_MESSAGE;

    const PLAIN: &str = r#"{"url":"a.com","summary":"s","purpose":"p","howItWorks":"h","requirements":{"functional":["f1 [1]"],"technical":[],"userExperience":[]},"structure":[]}"#;

    #[test]
    fn test_fenced_payload_scenario() {
        let payload = format!("```json\n{PLAIN}\n```");
        let result = ingest(&payload).unwrap().with_sources(vec![]);

        assert_eq!(result.domain(), "a.com");
        assert_eq!(result.requirements().functional[0], "f1 ");
    }

    #[test]
    fn test_fence_variants_match_unwrapped() {
        let expected = ingest(PLAIN).unwrap();
        let variants = [
            format!("```json\n{PLAIN}\n```"),
            format!("```\n{PLAIN}\n```"),
            format!("```JSON\r\n{PLAIN}\r\n```\n"),
            format!("  ```json\n{PLAIN}\n```  "),
            format!("```json\n{PLAIN}"),
        ];
        for variant in variants {
            assert_eq!(ingest(&variant).unwrap(), expected, "variant: {variant:?}");
        }
    }

    #[test]
    fn test_citations_removed_but_numbers_kept() {
        let payload = r#"{"url":"https://a.com","summary":"Offers Plan 3[2] and [10]more","purpose":"Top 10 [3][4]","howItWorks":"v2.1","requirements":{"functional":["Plan 3"],"technical":["[7]TLS 1.3"],"userExperience":[]},"structure":[{"page":"/plans [5]","description":"Plan [A] list"}]}"#;
        let result = ingest(payload).unwrap().with_sources(vec![]);

        assert_eq!(result.summary(), "Offers Plan 3 and more");
        assert_eq!(result.purpose(), "Top 10 ");
        assert_eq!(result.operational_flow(), "v2.1");
        assert_eq!(result.requirements().functional, vec!["Plan 3".to_string()]);
        assert_eq!(result.requirements().technical, vec!["TLS 1.3".to_string()]);
        assert_eq!(result.structure()[0].page, "/plans ");
        assert_eq!(result.structure()[0].description, "Plan [A] list");
    }

    #[test]
    fn test_non_ascii_digits_are_not_citations() {
        assert_eq!(strip_citations("Tier [３] pricing"), "Tier [３] pricing");

        let payload = r#"{"url":"https://a.com","summary":"Tier [３] pricing, chapter [٣][1]","purpose":"p","howItWorks":"h","requirements":{"functional":[],"technical":[],"userExperience":[]},"structure":[]}"#;
        let result = ingest(payload).unwrap().with_sources(vec![]);
        assert_eq!(result.summary(), "Tier [３] pricing, chapter [٣]");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            PLAIN.to_string(),
            format!("```json\n{PLAIN}\n```"),
            "nested [[1]2] marker".to_string(),
            "[1]```json\n{}\n```".to_string(),
            "```\n```json\n[3]\n```\n```".to_string(),
            String::new(),
        ];
        for input in inputs {
            let once = sanitize(&input);
            assert_eq!(sanitize(&once), once, "input: {input:?}");
        }
        assert_eq!(sanitize("nested [[1]2] marker"), "nested  marker");
    }

    #[test]
    fn test_clean_input_is_unchanged() {
        assert_eq!(sanitize(PLAIN.replace(" [1]", "").as_str()), PLAIN.replace(" [1]", ""));
    }

    #[test]
    fn test_empty_payload_fails() {
        for payload in ["", "   ", "```json\n```", "{}"] {
            let err = ingest(payload).unwrap_err();
            assert!(err.is_ingestion(), "payload: {payload:?}");
            assert_eq!(err.to_string(), INGESTION_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_malformed_payload_hides_parser_error() {
        let err = ingest(r#"{"url": "a.com", "summary": "#).unwrap_err();
        assert_eq!(err.to_string(), INGESTION_FAILED_MESSAGE);
        assert!(!err.log_detail().is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let payload = PLAIN.replace(r#","structure":[]"#, "");
        assert!(ingest(&payload).unwrap_err().is_ingestion());
    }

    #[test]
    fn test_empty_narratives_tolerated() {
        let payload = r#"{"url":"a.com","summary":"","purpose":"","howItWorks":"","requirements":{"functional":[],"technical":[],"userExperience":[]},"structure":[]}"#;
        let result = ingest(payload).unwrap().with_sources(vec![]);
        assert_eq!(result.summary(), "");
        assert!(result.structure().is_empty());
    }
}
