//! The triage service: quiz generation, then score → organize.
//!
//! Stages run strictly in order and hand typed values to each other. A
//! scoring failure stops the pipeline before organization; an organization
//! failure leaves the recorded assessment in place so [`TriageService::reorganize`]
//! can finish the job later.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Result, Stage, TriageError};
use crate::model::{
    AnswerSet, Assessment, Audience, ContentType, Organization, OrganizeHints, Question,
    QuizStart, SessionStatus, Summary, TriageOutcome,
};
use crate::organizer::organize;
use crate::scoring::Scorer;
use crate::session::SessionStore;
use crate::traits::{
    GeneratedQuiz, MetadataExtractor, MetadataRequest, QuizGenerator, QuizRequest, Summarizer,
    SummaryRequest,
};

/// Smallest quiz a learner can request.
pub const MIN_QUESTIONS: u32 = 3;
/// Largest quiz a learner can request.
pub const MAX_QUESTIONS: u32 = 10;

/// Topic assigned to generated questions that name none.
pub const DEFAULT_TOPIC: &str = "General";

/// Content submitted for organization or summarization.
#[derive(Debug, Clone)]
pub struct ContentInput {
    pub content: String,
    pub content_type: ContentType,
}

impl ContentInput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentType::Text,
        }
    }
}

/// Entry point for all boundary operations.
pub struct TriageService {
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn QuizGenerator>,
    extractor: Arc<dyn MetadataExtractor>,
    summarizer: Arc<dyn Summarizer>,
    scorer: Scorer,
}

impl TriageService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn QuizGenerator>,
        extractor: Arc<dyn MetadataExtractor>,
        summarizer: Arc<dyn Summarizer>,
        scorer: Scorer,
    ) -> Self {
        Self {
            store,
            generator,
            extractor,
            summarizer,
            scorer,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Generate a quiz and open a session for it.
    pub async fn start_assessment(
        &self,
        content: &ContentInput,
        num_questions: u32,
    ) -> Result<QuizStart> {
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&num_questions) {
            return Err(TriageError::validation(
                Stage::Assess,
                None,
                format!(
                    "num_questions must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {num_questions}"
                ),
            ));
        }
        if content.content.trim().is_empty() {
            return Err(TriageError::validation(
                Stage::Assess,
                None,
                "content is empty",
            ));
        }

        let request = QuizRequest {
            content: content.content.clone(),
            content_type: content.content_type,
            num_questions,
        };
        let quiz = self
            .generator
            .generate_quiz(&request)
            .await
            .map_err(|source| TriageError::Generation { source })?;

        let (title, topics, questions) =
            prepare_quiz(quiz).map_err(|source| TriageError::Generation { source })?;

        let public: Vec<_> = questions.iter().map(Question::to_public).collect();
        let session_id = self
            .store
            .create(title.clone(), topics.clone(), questions)?;

        tracing::info!(
            session_id = %session_id,
            topics = topics.len(),
            questions = public.len(),
            "started assessment"
        );

        Ok(QuizStart {
            session_id,
            status: SessionStatus::AwaitingAnswers,
            content_title: title,
            topics,
            questions: public,
        })
    }

    /// Score the answers, then organize the content using the result.
    pub async fn submit_answers(
        &self,
        session_id: &str,
        answers: &AnswerSet,
        content: &ContentInput,
        hints: &OrganizeHints,
    ) -> Result<TriageOutcome> {
        let assessment = self.scorer.score(self.store.as_ref(), session_id, answers)?;

        let organization = self
            .organize_with(Some(&assessment), Some(session_id), content, hints)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    session_id,
                    error = %e,
                    "organization failed after scoring; assessment kept for reorganize"
                );
            })?;

        Ok(TriageOutcome {
            assessment,
            organization,
        })
    }

    /// Re-derive organization for an already scored session.
    pub async fn reorganize(
        &self,
        session_id: &str,
        content: &ContentInput,
        hints: &OrganizeHints,
    ) -> Result<TriageOutcome> {
        let assessment = self.store.assessment(session_id)?.ok_or_else(|| {
            TriageError::validation(
                Stage::Organize,
                Some(session_id),
                "session has not been scored yet",
            )
        })?;

        let organization = self
            .organize_with(Some(&assessment), Some(session_id), content, hints)
            .await?;

        Ok(TriageOutcome {
            assessment,
            organization,
        })
    }

    /// Organize content without a prior assessment.
    pub async fn organize(
        &self,
        content: &ContentInput,
        hints: &OrganizeHints,
    ) -> Result<Organization> {
        self.organize_with(None, None, content, hints).await
    }

    /// Summarize content, emphasizing the gaps of `assessment` if given.
    pub async fn summarize(
        &self,
        content: &ContentInput,
        audience: Audience,
        assessment: Option<&Assessment>,
    ) -> Result<Summary> {
        let request = SummaryRequest {
            content: content.content.clone(),
            content_type: content.content_type,
            audience,
            gaps: assessment.map(Assessment::gaps),
        };
        self.summarizer
            .summarize(&request)
            .await
            .map_err(|source| TriageError::Summarization { source })
    }

    async fn organize_with(
        &self,
        assessment: Option<&Assessment>,
        session_id: Option<&str>,
        content: &ContentInput,
        hints: &OrganizeHints,
    ) -> Result<Organization> {
        let request = MetadataRequest {
            content: content.content.clone(),
            content_type: content.content_type,
            url: hints.url.clone(),
            existing_subjects: hints.existing_subjects.clone(),
            assessment: assessment.cloned(),
        };
        let suggestion = self
            .extractor
            .extract_metadata(&request)
            .await
            .map_err(|source| TriageError::Extraction {
                session_id: session_id.map(str::to_string),
                source,
            })?;

        Ok(organize(assessment, &suggestion, hints))
    }
}

/// Check a generated quiz and turn it into session parts.
///
/// Blank topics become [`DEFAULT_TOPIC`], and topics used by questions but
/// missing from the topic list are appended in first-appearance order.
fn prepare_quiz(quiz: GeneratedQuiz) -> anyhow::Result<(String, Vec<String>, Vec<Question>)> {
    anyhow::ensure!(!quiz.questions.is_empty(), "generated quiz has no questions");

    let mut topics: Vec<String> = Vec::new();
    for topic in &quiz.topics {
        let topic = topic.trim();
        if !topic.is_empty() && !topics.iter().any(|t| t == topic) {
            topics.push(topic.to_string());
        }
    }

    let mut seen_ids = HashSet::new();
    let mut questions = Vec::with_capacity(quiz.questions.len());
    for generated in quiz.questions {
        let id = generated.id.trim().to_string();
        anyhow::ensure!(!id.is_empty(), "generated question has an empty id");
        anyhow::ensure!(
            seen_ids.insert(id.clone()),
            "duplicate question id '{id}' in generated quiz"
        );
        anyhow::ensure!(
            generated.options.len() >= 2,
            "question '{id}' has fewer than two options"
        );
        let correct_answer = generated.correct_answer.trim().to_string();
        anyhow::ensure!(
            generated.options.contains_key(&correct_answer),
            "question '{id}' marks '{correct_answer}' correct, which is not one of its options"
        );

        let topic = match generated.topic.trim() {
            "" => DEFAULT_TOPIC.to_string(),
            t => t.to_string(),
        };
        if !topics.contains(&topic) {
            topics.push(topic.clone());
        }

        questions.push(Question {
            id,
            topic,
            prompt: generated.prompt,
            options: generated.options,
            correct_answer,
        });
    }

    let title = match quiz.title.trim() {
        "" => "Quiz".to_string(),
        t => t.to_string(),
    };

    Ok((title, topics, questions))
}
