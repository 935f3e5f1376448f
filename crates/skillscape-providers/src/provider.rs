//! The LLM provider trait and its request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for LLM backends that answer a single prompt.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a completion for a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List well-known models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// A binary document sent alongside the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// MIME type, e.g. "application/pdf".
    pub media_type: String,
    /// Base64-encoded bytes.
    pub data_base64: String,
}

impl Document {
    pub fn pdf(data_base64: impl Into<String>) -> Self {
        Self {
            media_type: "application/pdf".to_string(),
            data_base64: data_base64.into(),
        }
    }
}

/// Request to an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Document to attach before the prompt.
    #[serde(default)]
    pub document: Option<Document>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Ask the provider for a JSON-only response where it supports that.
    #[serde(default)]
    pub json_response: bool,
}

/// Response from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Whether PDF documents can be attached.
    pub supports_pdf: bool,
}
