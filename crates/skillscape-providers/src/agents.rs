//! LLM-backed implementations of the core collaborator traits.

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{ensure, Context};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use skillscape_core::model::{Audience, ContentType, Summary};
use skillscape_core::traits::{
    GeneratedQuiz, MetadataExtractor, MetadataRequest, MetadataSuggestion, QuizGenerator,
    QuizRequest, Summarizer, SummaryRequest,
};

use crate::json::parse_json;
use crate::prompts;
use crate::provider::{Document, GenerateRequest, LlmProvider};

/// Characters of inline text sent for quiz generation and metadata extraction.
const ASSESS_CONTENT_CHARS: usize = 5_000;
/// Characters of inline text sent for summaries.
const SUMMARY_CONTENT_CHARS: usize = 8_000;

/// Truncate text content, or swap PDF content for an attachment.
fn prepare_content(
    content: &str,
    content_type: ContentType,
    max_chars: usize,
) -> (Cow<'_, str>, Option<Document>) {
    match content_type {
        ContentType::Pdf => (
            Cow::Borrowed(prompts::ATTACHED_DOCUMENT),
            Some(Document::pdf(content)),
        ),
        ContentType::Text => match content.char_indices().nth(max_chars) {
            Some((cut, _)) => (Cow::Owned(content[..cut].to_string()), None),
            None => (Cow::Borrowed(content), None),
        },
    }
}

/// Shared plumbing: one provider, one model, one JSON reply per call.
struct Agent {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl Agent {
    async fn ask<T: serde::de::DeserializeOwned>(
        &self,
        system_prompt: &str,
        prompt: String,
        document: Option<Document>,
        max_tokens: u32,
        temperature: f64,
    ) -> anyhow::Result<T> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            system_prompt: Some(system_prompt.to_string()),
            document,
            max_tokens,
            temperature,
            json_response: true,
        };
        let response = self.provider.generate(&request).await.with_context(|| {
            format!(
                "{} request for model {} failed",
                self.provider.name(),
                self.model
            )
        })?;
        debug!(
            latency_ms = response.latency_ms,
            tokens = response.token_usage.total_tokens,
            "received model reply"
        );
        parse_json(&response.content)
    }
}

/// Generates quizzes by prompting an LLM.
pub struct LlmQuizGenerator {
    agent: Agent,
}

impl LlmQuizGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            agent: Agent {
                provider,
                model: model.into(),
            },
        }
    }
}

#[async_trait]
impl QuizGenerator for LlmQuizGenerator {
    #[instrument(skip(self, request), fields(model = %self.agent.model, num_questions = request.num_questions))]
    async fn generate_quiz(&self, request: &QuizRequest) -> anyhow::Result<GeneratedQuiz> {
        let (content, document) =
            prepare_content(&request.content, request.content_type, ASSESS_CONTENT_CHARS);
        let prompt = prompts::quiz_prompt(&content, request.num_questions);

        let quiz: GeneratedQuiz = self
            .agent
            .ask(prompts::ASSESSOR_SYSTEM_PROMPT, prompt, document, 8192, 0.3)
            .await
            .context("quiz generation failed")?;
        ensure!(!quiz.questions.is_empty(), "model returned a quiz with no questions");
        Ok(quiz)
    }
}

/// Extracts catalog metadata by prompting an LLM.
pub struct LlmMetadataExtractor {
    agent: Agent,
}

impl LlmMetadataExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            agent: Agent {
                provider,
                model: model.into(),
            },
        }
    }
}

#[async_trait]
impl MetadataExtractor for LlmMetadataExtractor {
    #[instrument(skip(self, request), fields(model = %self.agent.model))]
    async fn extract_metadata(
        &self,
        request: &MetadataRequest,
    ) -> anyhow::Result<MetadataSuggestion> {
        let (content, document) =
            prepare_content(&request.content, request.content_type, ASSESS_CONTENT_CHARS);
        let prompt = prompts::organize_prompt(
            &content,
            request.url.as_deref(),
            &request.existing_subjects,
            request.assessment.as_ref(),
        );

        self.agent
            .ask(prompts::ORGANIZER_SYSTEM_PROMPT, prompt, document, 2048, 0.3)
            .await
            .context("metadata extraction failed")
    }
}

/// Writes summaries by prompting an LLM.
pub struct LlmSummarizer {
    agent: Agent,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            agent: Agent {
                provider,
                model: model.into(),
            },
        }
    }
}

#[derive(Deserialize, Default)]
struct SummaryBody {
    #[serde(default)]
    content: String,
    #[serde(default)]
    key_takeaways: Vec<String>,
    #[serde(default)]
    code_examples: Option<Vec<Option<String>>>,
}

/// Models sometimes nest the body under `summary`; accept both shapes.
#[derive(Deserialize)]
struct SummaryPayload {
    #[serde(default)]
    content_title: String,
    #[serde(default)]
    summary: Option<SummaryBody>,
    #[serde(flatten)]
    body: SummaryBody,
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    #[instrument(skip(self, request), fields(model = %self.agent.model, audience = %request.audience))]
    async fn summarize(&self, request: &SummaryRequest) -> anyhow::Result<Summary> {
        let (content, document) =
            prepare_content(&request.content, request.content_type, SUMMARY_CONTENT_CHARS);
        let prompt = prompts::summary_prompt(&content, request.audience, request.gaps.as_ref());

        let payload: SummaryPayload = self
            .agent
            .ask(prompts::SUMMARIZER_SYSTEM_PROMPT, prompt, document, 8192, 0.5)
            .await
            .context("summarization failed")?;

        let body = payload.summary.unwrap_or(payload.body);
        ensure!(!body.content.trim().is_empty(), "model returned an empty summary");

        let code_examples = match request.audience {
            Audience::Engineering => body
                .code_examples
                .map(|examples| examples.into_iter().flatten().collect()),
            _ => None,
        };

        Ok(Summary {
            content_title: payload.content_title,
            audience: request.audience,
            content: body.content,
            key_takeaways: body.key_takeaways,
            code_examples,
        })
    }
}
