//! GeminiApiClient - Direct REST API implementation for Gemini.
//!
//! Sends `generateContent` requests, optionally with the `google_search` tool
//! and a JSON response schema, and returns the text together with the
//! grounding metadata of the first candidate.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sitescout_core::error::{Result, SiteScoutError};
use sitescout_core::generation::{
    GenerationRequest, GenerationResponse, GenerationService, GroundingMetadata, ResponseSchema,
};
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const JSON_MIME_TYPE: &str = "application/json";

/// Client for the Gemini HTTP API.
///
/// Construct once per process and share it; the inner `reqwest::Client`
/// pools connections.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiApiClient {
    /// Creates a client with the given API key and per-request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SiteScoutError::configuration(
                sitescout_core::secret::MISSING_API_KEY_MESSAGE,
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SiteScoutError::internal(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Overrides the API base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{model}:generateContent", self.base_url)
    }

    async fn send_request(&self, model: &str, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                warn!(
                    is_timeout = err.is_timeout(),
                    is_connect = err.is_connect(),
                    "Gemini API request failed"
                );
                SiteScoutError::transport(format!("Gemini API request failed: {}", err.without_url()), None)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        response.json().await.map_err(|err| {
            SiteScoutError::transport(format!("Failed to parse Gemini response: {err}"), None)
        })
    }
}

#[async_trait]
impl GenerationService for GeminiApiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        debug!(
            model = %request.model,
            use_search = request.use_search,
            constrained = request.response_schema.is_some(),
            prompt_len = request.prompt.len(),
            "Calling Gemini"
        );

        let body = GenerateContentRequest::from_generation(&request);
        let parsed = self.send_request(&request.model, &body).await?;
        let response = parsed.into_generation_response();

        debug!(
            text_len = response.text.as_deref().map_or(0, str::len),
            chunks = response.grounding.grounding_chunks.len(),
            "Gemini responded"
        );
        Ok(response)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn from_generation(request: &GenerationRequest) -> Self {
        let tools = if request.use_search {
            vec![Tool::default()]
        } else {
            Vec::new()
        };

        let generation_config = request.response_schema.as_ref().map(|schema| GenerationConfig {
            response_mime_type: JSON_MIME_TYPE.to_string(),
            response_schema: schema.clone(),
        });

        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            tools,
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Default)]
struct Tool {
    #[serde(rename = "google_search")]
    google_search: GoogleSearchConfig,
}

#[derive(Debug, Serialize, Default)]
struct GoogleSearchConfig {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: ResponseSchema,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text and grounding of the first candidate; text parts are concatenated.
    fn into_generation_response(self) -> GenerationResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return GenerationResponse::default();
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        GenerationResponse {
            text: (!text.is_empty()).then_some(text),
            grounding: candidate.grounding_metadata.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn map_http_error(status: StatusCode, body: &str) -> SiteScoutError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message.filter(|m| !m.trim().is_empty())?;
            Some(match wrapper.error.status.filter(|s| !s.is_empty()) {
                Some(status_text) => format!("{status_text}: {msg}"),
                None => msg,
            })
        });

    warn!(status = status.as_u16(), "Gemini API returned an error status");
    SiteScoutError::Transport {
        message,
        status_code: Some(status.as_u16()),
    }
}
