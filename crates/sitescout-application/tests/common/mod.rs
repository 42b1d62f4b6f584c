//! Shared fixtures for application tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sitescout_core::error::{Result, SiteScoutError};
use sitescout_core::generation::{
    GenerationRequest, GenerationResponse, GenerationService, GroundingChunk, GroundingMetadata,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Generation service that replays scripted responses and records requests.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<GenerationResponse>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, text: &str, chunks: Vec<GroundingChunk>) -> &Self {
        self.push(Ok(GenerationResponse {
            text: Some(text.to_string()),
            grounding: GroundingMetadata {
                grounding_chunks: chunks,
                search_entry_point: None,
            },
        }))
    }

    pub fn push(&self, response: Result<GenerationResponse>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SiteScoutError::transport("no scripted response", None)))
    }
}

/// Generation service whose calls never complete.
pub struct PendingGenerator;

#[async_trait]
impl GenerationService for PendingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse> {
        std::future::pending().await
    }
}

pub fn analysis_payload(domain: &str) -> String {
    serde_json::json!({
        "url": domain,
        "summary": "Subscription billing platform [1]",
        "purpose": "Sell Plan 3 upgrades",
        "howItWorks": "Checkout via Stripe [2]",
        "requirements": {
            "functional": ["Account signup [3]"],
            "technical": ["TLS"],
            "userExperience": []
        },
        "structure": [
            {"page": "/", "description": "Landing"},
            {"page": "/pricing", "description": "Plans"}
        ]
    })
    .to_string()
}
