//! Triage error types.
//!
//! Every failure carries the pipeline stage it came from and, where one
//! exists, the session id, so callers can decide which stage to retry.

use std::fmt;

use thiserror::Error;

/// The pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Quiz generation and session creation.
    Assess,
    /// Answer validation and scoring.
    Score,
    /// Metadata extraction and content organization.
    Organize,
    /// Audience-tailored summaries.
    Summarize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Assess => write!(f, "assess"),
            Stage::Score => write!(f, "score"),
            Stage::Organize => write!(f, "organize"),
            Stage::Summarize => write!(f, "summarize"),
        }
    }
}

/// Errors surfaced by the triage pipeline.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The session id is unknown or the session has expired.
    #[error("quiz session {session_id} not found")]
    SessionNotFound { session_id: String },

    /// Answers were already submitted for this session.
    #[error("quiz session {session_id} has already been scored")]
    SessionAlreadyScored { session_id: String },

    /// The request was malformed (unknown question, unknown option, bad count).
    #[error("invalid {stage} request: {message}")]
    Validation {
        stage: Stage,
        session_id: Option<String>,
        message: String,
    },

    /// The quiz generator failed or returned an unusable quiz.
    #[error("quiz generation failed: {source:#}")]
    Generation {
        #[source]
        source: anyhow::Error,
    },

    /// Metadata extraction failed.
    #[error("metadata extraction failed: {source:#}")]
    Extraction {
        session_id: Option<String>,
        #[source]
        source: anyhow::Error,
    },

    /// Summary generation failed.
    #[error("summarization failed: {source:#}")]
    Summarization {
        #[source]
        source: anyhow::Error,
    },

    /// Invalid configuration (e.g. inverted scoring thresholds).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TriageError {
    pub(crate) fn validation(
        stage: Stage,
        session_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        TriageError::Validation {
            stage,
            session_id: session_id.map(str::to_string),
            message: message.into(),
        }
    }

    /// The stage that failed. Configuration errors have no stage.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TriageError::SessionNotFound { .. } | TriageError::SessionAlreadyScored { .. } => {
                Some(Stage::Score)
            }
            TriageError::Validation { stage, .. } => Some(*stage),
            TriageError::Generation { .. } => Some(Stage::Assess),
            TriageError::Extraction { .. } => Some(Stage::Organize),
            TriageError::Summarization { .. } => Some(Stage::Summarize),
            TriageError::Config(_) => None,
        }
    }

    /// The session this failure relates to, if any.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            TriageError::SessionNotFound { session_id }
            | TriageError::SessionAlreadyScored { session_id } => Some(session_id),
            TriageError::Validation { session_id, .. }
            | TriageError::Extraction { session_id, .. } => session_id.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if the caller sent a bad request (as opposed to an
    /// upstream collaborator or configuration failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TriageError::SessionNotFound { .. }
                | TriageError::SessionAlreadyScored { .. }
                | TriageError::Validation { .. }
        )
    }
}

/// Errors raised by a [`SessionStore`](crate::session::SessionStore).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(String),

    #[error("session id {0} is already in use")]
    DuplicateId(String),
}

impl From<StoreError> for TriageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(session_id) => TriageError::SessionNotFound { session_id },
            StoreError::DuplicateId(id) => TriageError::Generation {
                source: anyhow::anyhow!("could not allocate a unique session id ({id})"),
            },
        }
    }
}

/// Convenience alias used throughout the core.
pub type Result<T, E = TriageError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TriageError::SessionNotFound {
            session_id: "abc".into(),
        };
        assert_eq!(err.to_string(), "quiz session abc not found");

        let err = TriageError::validation(Stage::Score, Some("abc"), "unknown question id 'q9'");
        assert_eq!(
            err.to_string(),
            "invalid score request: unknown question id 'q9'"
        );
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(TriageError::SessionAlreadyScored {
            session_id: "s".into()
        }
        .is_client_error());
        assert!(!TriageError::Generation {
            source: anyhow::anyhow!("boom")
        }
        .is_client_error());
        assert!(!TriageError::Config("bad".into()).is_client_error());
    }

    #[test]
    fn stage_and_session_context() {
        let err = TriageError::Extraction {
            session_id: Some("s-1".into()),
            source: anyhow::anyhow!("upstream 503"),
        };
        assert_eq!(err.stage(), Some(Stage::Organize));
        assert_eq!(err.session_id(), Some("s-1"));
        assert!(err.to_string().contains("upstream 503"));
    }

    #[test]
    fn store_not_found_maps_to_session_not_found() {
        let err: TriageError = StoreError::NotFound("gone".into()).into();
        assert!(matches!(err, TriageError::SessionNotFound { ref session_id } if session_id == "gone"));
    }
}
