//! Quiz scoring and topic classification.
//!
//! A topic's score is the fraction of its questions answered correctly;
//! unanswered questions count as wrong. Overall knowledge is the unweighted
//! mean of the topic scores, so a heavily tested topic cannot dominate.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, Stage, TriageError};
use crate::model::{AnswerSet, Assessment, QuizSession, TopicAssessment, TopicStatus};
use crate::session::{SessionStore, Transition};

/// Thresholds used to classify topic scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Scores at or above this are `proficient`.
    #[serde(default = "default_proficiency")]
    pub proficiency_threshold: f64,
    /// Scores below this are `needs_review`.
    #[serde(default = "default_review")]
    pub review_threshold: f64,
}

fn default_proficiency() -> f64 {
    0.8
}

fn default_review() -> f64 {
    0.5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            proficiency_threshold: default_proficiency(),
            review_threshold: default_review(),
        }
    }
}

impl ScoringConfig {
    /// Both thresholds must lie in [0, 1] with review ≤ proficiency.
    pub fn validate(&self) -> Result<()> {
        let in_range = |t: f64| (0.0..=1.0).contains(&t);
        if !in_range(self.proficiency_threshold) || !in_range(self.review_threshold) {
            return Err(TriageError::Config(format!(
                "scoring thresholds must be within [0, 1] (proficiency = {}, review = {})",
                self.proficiency_threshold, self.review_threshold
            )));
        }
        if self.review_threshold > self.proficiency_threshold {
            return Err(TriageError::Config(format!(
                "review threshold {} exceeds proficiency threshold {}",
                self.review_threshold, self.proficiency_threshold
            )));
        }
        Ok(())
    }

    pub fn classify(&self, score: f64) -> TopicStatus {
        if score >= self.proficiency_threshold {
            TopicStatus::Proficient
        } else if score < self.review_threshold {
            TopicStatus::NeedsReview
        } else {
            TopicStatus::Developing
        }
    }
}

/// Reject submissions that reference unknown questions or options.
///
/// Answers are checked in question-id order so the reported problem is
/// stable across runs.
pub fn validate_answers(session: &QuizSession, answers: &AnswerSet) -> Result<()> {
    let sorted: BTreeMap<&String, &String> = answers.iter().collect();
    for (question_id, label) in sorted {
        let Some(question) = session.question(question_id) else {
            return Err(TriageError::validation(
                Stage::Score,
                Some(&session.session_id),
                format!("unknown question id '{question_id}'"),
            ));
        };
        if !question.options.contains_key(label.as_str()) {
            return Err(TriageError::validation(
                Stage::Score,
                Some(&session.session_id),
                format!("question '{question_id}' has no option '{label}'"),
            ));
        }
    }
    Ok(())
}

/// Score a session against a (validated) answer set.
pub fn assess(session: &QuizSession, answers: &AnswerSet, config: &ScoringConfig) -> Assessment {
    let mut order: Vec<&str> = session.topics.iter().map(String::as_str).collect();
    let mut tally: HashMap<&str, (u32, u32)> = HashMap::new();

    for question in &session.questions {
        let topic = question.topic.as_str();
        if !order.contains(&topic) {
            order.push(topic);
        }
        let (correct, total) = tally.entry(topic).or_default();
        *total += 1;
        if answers
            .get(&question.id)
            .is_some_and(|label| question.is_correct(label))
        {
            *correct += 1;
        }
    }

    let topics_assessed: Vec<TopicAssessment> = order
        .iter()
        .filter_map(|topic| {
            let (correct, total) = tally.get(topic).copied()?;
            if total == 0 {
                return None;
            }
            let score = f64::from(correct) / f64::from(total);
            Some(TopicAssessment {
                topic: topic.to_string(),
                score,
                status: config.classify(score),
                questions_correct: correct,
                questions_total: total,
            })
        })
        .collect();

    let overall_knowledge = if topics_assessed.is_empty() {
        0.0
    } else {
        let sum: f64 = topics_assessed.iter().map(|t| t.score).sum();
        (sum / topics_assessed.len() as f64).clamp(0.0, 1.0)
    };

    let topics_with = |status: TopicStatus| -> Vec<String> {
        topics_assessed
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.topic.clone())
            .collect()
    };
    let focus_areas = topics_with(TopicStatus::NeedsReview);
    let skip_areas = topics_with(TopicStatus::Proficient);

    Assessment {
        session_id: session.session_id.clone(),
        content_title: session.title.clone(),
        overall_knowledge,
        topics_assessed,
        focus_areas,
        skip_areas,
    }
}

/// Turns a stored session plus answers into an [`Assessment`].
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a session exactly once.
    ///
    /// The assessment is recorded and the session marked complete in one
    /// store operation; of two concurrent submissions only one can win, the
    /// other gets `SessionAlreadyScored`.
    pub fn score(
        &self,
        store: &dyn SessionStore,
        session_id: &str,
        answers: &AnswerSet,
    ) -> Result<Assessment> {
        let session = store.get(session_id)?;
        if session.is_complete() {
            return Err(TriageError::SessionAlreadyScored {
                session_id: session_id.to_string(),
            });
        }

        validate_answers(&session, answers)?;
        let assessment = assess(&session, answers, &self.config);

        match store.record_assessment(session_id, &assessment)? {
            Transition::Completed => {
                tracing::info!(
                    session_id,
                    overall = assessment.overall_knowledge,
                    answered = answers.len(),
                    questions = session.questions.len(),
                    "scored quiz session"
                );
                Ok(assessment)
            }
            Transition::AlreadyComplete => {
                tracing::warn!(session_id, "lost scoring race, session already complete");
                Err(TriageError::SessionAlreadyScored {
                    session_id: session_id.to_string(),
                })
            }
        }
    }
}
