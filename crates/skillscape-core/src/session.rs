//! In-memory quiz session registry.
//!
//! Each session lives behind its own mutex; the map lock is only held to
//! look up, insert, or drop entries, so work on one session never blocks
//! another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Assessment, Question, QuizSession, SessionStatus};

/// Default time-to-live for a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Outcome of a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// This call moved the session to `complete`.
    Completed,
    /// The session was already complete; nothing changed.
    AlreadyComplete,
}

/// Storage for quiz sessions.
pub trait SessionStore: Send + Sync {
    /// Insert a new session awaiting answers and return its id.
    fn create(
        &self,
        title: String,
        topics: Vec<String>,
        questions: Vec<Question>,
    ) -> Result<String, StoreError>;

    /// Snapshot of a session.
    fn get(&self, session_id: &str) -> Result<QuizSession, StoreError>;

    /// Move a session to `complete`. Calling it again is a no-op.
    fn mark_complete(&self, session_id: &str) -> Result<Transition, StoreError>;

    /// Mark complete and store `assessment`, atomically. The assessment is
    /// only stored if this call performed the transition.
    fn record_assessment(
        &self,
        session_id: &str,
        assessment: &Assessment,
    ) -> Result<Transition, StoreError>;

    /// The assessment recorded for a session, if it has been scored.
    fn assessment(&self, session_id: &str) -> Result<Option<Assessment>, StoreError>;

    /// Drop a session. Returns `false` if it did not exist.
    fn remove(&self, session_id: &str) -> bool;

    /// Drop every expired session and return how many were removed.
    fn purge_expired(&self) -> usize;

    /// Number of sessions currently held, expired ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Entry = Arc<Mutex<QuizSession>>;

/// Process-local [`SessionStore`] with lazy TTL expiry.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    ttl: Option<Duration>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Some(DEFAULT_SESSION_TTL))
    }
}

impl InMemorySessionStore {
    /// Create a store. `None` disables expiry.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, session: &QuizSession) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        (Utc::now() - session.created_at)
            .to_std()
            .map(|age| age >= ttl)
            .unwrap_or(false)
    }

    fn entry(&self, session_id: &str) -> Result<Entry, StoreError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))
    }

    /// Run `f` on a live session under its lock. Expired sessions are
    /// evicted and reported as missing.
    fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut QuizSession) -> T,
    ) -> Result<T, StoreError> {
        let entry = self.entry(session_id)?;
        {
            let mut session = lock(&entry);
            if !self.is_expired(&session) {
                return Ok(f(&mut session));
            }
        }
        tracing::debug!(session_id, "evicting expired quiz session");
        self.remove(session_id);
        Err(StoreError::NotFound(session_id.to_string()))
    }
}

fn lock(entry: &Entry) -> MutexGuard<'_, QuizSession> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn complete(session: &mut QuizSession) -> Transition {
    match session.status {
        SessionStatus::Complete => Transition::AlreadyComplete,
        SessionStatus::AwaitingAnswers => {
            session.status = SessionStatus::Complete;
            Transition::Completed
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(
        &self,
        title: String,
        topics: Vec<String>,
        questions: Vec<Question>,
    ) -> Result<String, StoreError> {
        let session_id = Uuid::new_v4().to_string();
        let session = QuizSession {
            session_id: session_id.clone(),
            title,
            topics,
            questions,
            status: SessionStatus::AwaitingAnswers,
            created_at: Utc::now(),
            assessment: None,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(&session_id) {
            return Err(StoreError::DuplicateId(session_id));
        }
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(session)));
        tracing::debug!(session_id = %session_id, total = sessions.len(), "created quiz session");
        Ok(session_id)
    }

    fn get(&self, session_id: &str) -> Result<QuizSession, StoreError> {
        self.with_session(session_id, |session| session.clone())
    }

    fn mark_complete(&self, session_id: &str) -> Result<Transition, StoreError> {
        self.with_session(session_id, complete)
    }

    fn record_assessment(
        &self,
        session_id: &str,
        assessment: &Assessment,
    ) -> Result<Transition, StoreError> {
        self.with_session(session_id, |session| {
            let transition = complete(session);
            if transition == Transition::Completed {
                session.assessment = Some(assessment.clone());
            }
            transition
        })
    }

    fn assessment(&self, session_id: &str) -> Result<Option<Assessment>, StoreError> {
        self.with_session(session_id, |session| session.assessment.clone())
    }

    fn remove(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some()
    }

    fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(&lock(entry)));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, remaining = sessions.len(), "purged expired quiz sessions");
        }
        purged
    }

    fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn question(id: &str, topic: &str) -> Question {
        Question {
            id: id.into(),
            topic: topic.into(),
            prompt: format!("{id}?"),
            options: BTreeMap::from([
                ("A".to_string(), "yes".to_string()),
                ("B".to_string(), "no".to_string()),
            ]),
            correct_answer: "A".into(),
        }
    }

    fn new_session(store: &InMemorySessionStore) -> String {
        store
            .create(
                "Rust".into(),
                vec!["Ownership".into()],
                vec![question("q1", "Ownership")],
            )
            .unwrap()
    }

    fn assessment(session_id: &str, overall: f64) -> Assessment {
        Assessment {
            session_id: session_id.into(),
            content_title: "Rust".into(),
            overall_knowledge: overall,
            topics_assessed: vec![],
            focus_areas: vec![],
            skip_areas: vec![],
        }
    }

    #[test]
    fn create_and_get() {
        let store = InMemorySessionStore::default();
        let id = new_session(&store);

        let session = store.get(&id).unwrap();
        assert_eq!(session.session_id, id);
        assert_eq!(session.status, SessionStatus::AwaitingAnswers);
        assert_eq!(session.topics, vec!["Ownership".to_string()]);
        assert!(session.assessment.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let store = InMemorySessionStore::default();
        let a = new_session(&store);
        let b = new_session(&store);
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = InMemorySessionStore::default();
        assert_eq!(
            store.get("missing").unwrap_err(),
            StoreError::NotFound("missing".into())
        );
        assert!(store.mark_complete("missing").is_err());
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let store = InMemorySessionStore::default();
        let id = new_session(&store);

        assert_eq!(store.mark_complete(&id).unwrap(), Transition::Completed);
        assert_eq!(
            store.mark_complete(&id).unwrap(),
            Transition::AlreadyComplete
        );
        assert_eq!(store.get(&id).unwrap().status, SessionStatus::Complete);
    }

    #[test]
    fn record_assessment_keeps_first_result() {
        let store = InMemorySessionStore::default();
        let id = new_session(&store);

        let first = assessment(&id, 0.75);
        assert_eq!(
            store.record_assessment(&id, &first).unwrap(),
            Transition::Completed
        );
        assert_eq!(
            store.record_assessment(&id, &assessment(&id, 0.0)).unwrap(),
            Transition::AlreadyComplete
        );
        assert_eq!(store.mark_complete(&id).unwrap(), Transition::AlreadyComplete);
        assert_eq!(store.assessment(&id).unwrap(), Some(first));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let store = InMemorySessionStore::new(Some(Duration::ZERO));
        let id = new_session(&store);

        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn purge_drops_only_expired_sessions() {
        let store = InMemorySessionStore::new(Some(Duration::ZERO));
        new_session(&store);
        new_session(&store);
        assert_eq!(store.purge_expired(), 2);
        assert!(store.is_empty());

        let store = InMemorySessionStore::new(None);
        new_session(&store);
        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_is_explicit_teardown() {
        let store = InMemorySessionStore::default();
        let id = new_session(&store);
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.get(&id).is_err());
    }

    #[test]
    fn concurrent_completion_has_one_winner() {
        let store = InMemorySessionStore::default();
        let id = new_session(&store);

        let transitions: Vec<Transition> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    let id = &id;
                    scope.spawn(move || {
                        store
                            .record_assessment(id, &assessment(id, i as f64 / 8.0))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners = transitions
            .iter()
            .filter(|t| **t == Transition::Completed)
            .count();
        assert_eq!(winners, 1);
    }
}
