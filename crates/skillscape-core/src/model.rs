//! Core data model types for skillscape.
//!
//! Quiz sessions, assessments, and the content catalog records the pipeline
//! produces from them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learner submission: question id → chosen option label.
pub type AnswerSet = HashMap<String, String>;

/// How the submitted content is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain text.
    #[default]
    Text,
    /// Base64-encoded PDF document.
    Pdf,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ContentType::Text),
            "pdf" => Ok(ContentType::Pdf),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    AwaitingAnswers,
    Complete,
}

/// One quiz item, including its correct answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique within its session.
    pub id: String,
    /// The topic this question probes.
    pub topic: String,
    /// The question text.
    pub prompt: String,
    /// Option label (e.g. "A") → option text.
    pub options: BTreeMap<String, String>,
    /// Label of the correct option. Never exposed before scoring.
    pub correct_answer: String,
}

impl Question {
    /// The client-facing view of this question.
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id.clone(),
            topic: self.topic.clone(),
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        }
    }

    pub fn is_correct(&self, label: &str) -> bool {
        self.correct_answer == label
    }
}

/// A question as shown to the learner, without the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: String,
    pub topic: String,
    pub prompt: String,
    pub options: BTreeMap<String, String>,
}

/// One in-flight assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub session_id: String,
    /// Title of the assessed content, as inferred by the quiz generator.
    pub title: String,
    /// Topics in presentation order.
    pub topics: Vec<String>,
    pub questions: Vec<Question>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    /// The result recorded when the session was scored.
    #[serde(default)]
    pub assessment: Option<Assessment>,
}

impl QuizSession {
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn public_questions(&self) -> Vec<PublicQuestion> {
        self.questions.iter().map(Question::to_public).collect()
    }
}

/// What a learner receives when an assessment starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizStart {
    pub session_id: String,
    pub status: SessionStatus,
    pub content_title: String,
    pub topics: Vec<String>,
    pub questions: Vec<PublicQuestion>,
}

/// Categorical label for a topic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Proficient,
    Developing,
    NeedsReview,
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicStatus::Proficient => write!(f, "proficient"),
            TopicStatus::Developing => write!(f, "developing"),
            TopicStatus::NeedsReview => write!(f, "needs_review"),
        }
    }
}

/// Per-topic result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssessment {
    pub topic: String,
    /// Fraction of this topic's questions answered correctly.
    pub score: f64,
    pub status: TopicStatus,
    pub questions_correct: u32,
    pub questions_total: u32,
}

/// Scorer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub session_id: String,
    pub content_title: String,
    /// Mean of the topic scores, in [0, 1].
    pub overall_knowledge: f64,
    /// Same order as the session topics.
    pub topics_assessed: Vec<TopicAssessment>,
    /// Topics that need review.
    pub focus_areas: Vec<String>,
    /// Topics the learner already knows.
    pub skip_areas: Vec<String>,
}

impl Assessment {
    pub fn gaps(&self) -> KnowledgeGaps {
        KnowledgeGaps {
            focus_areas: self.focus_areas.clone(),
            skip_areas: self.skip_areas.clone(),
        }
    }
}

/// The part of an assessment a summarizer needs to bias its output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGaps {
    pub focus_areas: Vec<String>,
    pub skip_areas: Vec<String>,
}

/// Kind of learning content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Course,
    Video,
    #[default]
    Article,
    Podcast,
    Paper,
    Other,
}

impl Medium {
    /// Map a free-form label (as produced by a model) onto a medium.
    /// Unknown labels become [`Medium::Other`].
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Medium::Other)
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Medium::Course => write!(f, "course"),
            Medium::Video => write!(f, "video"),
            Medium::Article => write!(f, "article"),
            Medium::Podcast => write!(f, "podcast"),
            Medium::Paper => write!(f, "paper"),
            Medium::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Medium {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "course" | "tutorial" => Ok(Medium::Course),
            "video" => Ok(Medium::Video),
            "article" | "blog" | "blog_post" => Ok(Medium::Article),
            "podcast" | "audio" => Ok(Medium::Podcast),
            "paper" | "research_paper" | "whitepaper" => Ok(Medium::Paper),
            "other" | "ebook" | "book" => Ok(Medium::Other),
            other => Err(format!("unknown medium: {other}")),
        }
    }
}

/// Progress of a content record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

impl ProgressStatus {
    /// 0 → not started, 100 → complete, anything between → in progress.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0 => ProgressStatus::NotStarted,
            p if p >= 100 => ProgressStatus::Complete,
            _ => ProgressStatus::InProgress,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::NotStarted => write!(f, "not_started"),
            ProgressStatus::InProgress => write!(f, "in_progress"),
            ProgressStatus::Complete => write!(f, "complete"),
        }
    }
}

/// Catalog record for a piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub title: String,
    pub medium: Medium,
    pub subjects: Vec<String>,
    pub status: ProgressStatus,
    pub progress_percent: u8,
    /// Platform or host name (e.g. "arxiv.org", "Udemy").
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Focus/skip note derived from the assessment.
    #[serde(default)]
    pub notes: Option<String>,
}

/// The raw, unreconciled metadata suggestion, kept beside the final record
/// so callers can see what was overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub title: String,
    pub medium: Medium,
    pub subjects: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_new_subject: bool,
    pub confidence: f64,
}

/// Organizer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub content_node: ContentNode,
    pub ai_suggestion: AiSuggestion,
}

/// Caller-supplied hints for the organizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeHints {
    /// Where the content came from.
    #[serde(default)]
    pub url: Option<String>,
    /// Subjects the caller wants attached, appended after the model's.
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Subjects already present in the learner's graph.
    #[serde(default)]
    pub existing_subjects: Vec<String>,
}

/// Combined output of the score → organize pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub assessment: Assessment,
    pub organization: Organization,
}

/// Target audience for a summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Engineering,
    Business,
    /// Personal learning reference.
    #[default]
    #[serde(rename = "self")]
    SelfStudy,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Engineering => write!(f, "engineering"),
            Audience::Business => write!(f, "business"),
            Audience::SelfStudy => write!(f, "self"),
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "engineering" | "eng" => Ok(Audience::Engineering),
            "business" | "exec" => Ok(Audience::Business),
            "self" | "personal" => Ok(Audience::SelfStudy),
            other => Err(format!("unknown audience: {other}")),
        }
    }
}

/// An audience-tailored summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub content_title: String,
    pub audience: Audience,
    /// Markdown body.
    pub content: String,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    /// Only populated for engineering audiences.
    #[serde(default)]
    pub code_examples: Option<Vec<String>>,
}
