//! Contract of the remote generation service.
//!
//! The service is an opaque collaborator: it receives a prompt plus an optional
//! search-grounding flag and an optional output schema, and answers with text
//! and grounding metadata. Concrete clients live in `sitescout-interaction`.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive types allowed in a response schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
}

/// Structured output descriptor sent with a schema-constrained call.
///
/// Serializes to the OpenAPI subset accepted by `generationConfig.responseSchema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ResponseSchema {
    pub fn string() -> Self {
        Self {
            schema_type: SchemaType::String,
            properties: BTreeMap::new(),
            items: None,
            required: Vec::new(),
        }
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self {
            schema_type: SchemaType::Array,
            properties: BTreeMap::new(),
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    /// Builds an object schema in which every listed property is required.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, ResponseSchema)>,
        K: Into<String>,
    {
        let mut map = BTreeMap::new();
        let mut required = Vec::new();
        for (name, schema) in properties {
            let name = name.into();
            required.push(name.clone());
            map.insert(name, schema);
        }
        Self {
            schema_type: SchemaType::Object,
            properties: map,
            items: None,
            required,
        }
    }
}

/// A single call to the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    /// Enables the search-grounding tool.
    pub use_search: bool,
    /// When present the model is asked for JSON matching this schema.
    pub response_schema: Option<ResponseSchema>,
}

impl GenerationRequest {
    /// Free-form request (follow-up path).
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            use_search: false,
            response_schema: None,
        }
    }

    pub fn with_search(mut self) -> Self {
        self.use_search = true;
        self
    }

    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Web citation carried by a grounding chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// One citation chunk from the grounding metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

impl GroundingChunk {
    pub fn web(title: Option<&str>, uri: Option<&str>) -> Self {
        Self {
            web: Some(WebChunk {
                title: title.map(str::to_string),
                uri: uri.map(str::to_string),
            }),
        }
    }
}

/// Provenance returned alongside a generated response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    /// Present when the service rendered a search entry point, i.e. it searched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<serde_json::Value>,
}

/// Response of the remote model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub grounding: GroundingMetadata,
}

/// Remote generation service.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}
