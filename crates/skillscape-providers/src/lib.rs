//! skillscape-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Gemini, Anthropic, and
//! OpenAI-compatible endpoints, and builds the core crate's quiz generator,
//! metadata extractor, and summarizer on top of them.

pub mod agents;
pub mod anthropic;
pub mod config;
pub mod error;
pub mod gemini;
pub mod json;
pub mod mock;
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod retry;

pub use agents::{LlmMetadataExtractor, LlmQuizGenerator, LlmSummarizer};
pub use config::{
    build_service, create_provider, load_config, load_config_from, provider_from_config,
    ProviderConfig, SkillscapeConfig,
};
pub use error::ProviderError;
pub use provider::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo};
pub use retry::RetryingProvider;
