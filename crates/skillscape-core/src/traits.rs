//! Capability traits for the external collaborators the pipeline calls.
//!
//! Quiz generation, metadata extraction, and summarization are implemented
//! by the `skillscape-providers` crate on top of LLM backends; tests inject
//! fakes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Assessment, Audience, ContentType, KnowledgeGaps, Summary};

// ---------------------------------------------------------------------------
// Quiz generation
// ---------------------------------------------------------------------------

/// Produces a structured quiz from learning content.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<GeneratedQuiz>;
}

/// Request to generate a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Plain text, or base64 when `content_type` is PDF.
    pub content: String,
    pub content_type: ContentType,
    /// Total number of questions to generate.
    pub num_questions: u32,
}

/// A quiz as returned by the generator, correct answers included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub questions: Vec<GeneratedQuestion>,
}

/// One generated question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: BTreeMap<String, String>,
    #[serde(alias = "correct")]
    pub correct_answer: String,
}

// ---------------------------------------------------------------------------
// Metadata extraction
// ---------------------------------------------------------------------------

/// Suggests catalog metadata for a piece of content.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract_metadata(
        &self,
        request: &MetadataRequest,
    ) -> anyhow::Result<MetadataSuggestion>;
}

/// Request to extract metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRequest {
    pub content: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub url: Option<String>,
    /// Subjects already in the learner's graph, so the model can reuse them.
    #[serde(default)]
    pub existing_subjects: Vec<String>,
    /// Scorer output, when organization follows an assessment.
    #[serde(default)]
    pub assessment: Option<Assessment>,
}

/// Raw metadata as suggested by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSuggestion {
    #[serde(default)]
    pub title: String,
    /// Free-form medium label, mapped onto [`Medium`](crate::model::Medium)
    /// by the organizer.
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_new_subject: bool,
    #[serde(default)]
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Summarization
// ---------------------------------------------------------------------------

/// Writes audience-tailored summaries.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> anyhow::Result<Summary>;
}

/// Request to summarize content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub content: String,
    pub content_type: ContentType,
    pub audience: Audience,
    /// Knowledge gaps to emphasize, when an assessment is available.
    #[serde(default)]
    pub gaps: Option<KnowledgeGaps>,
}
