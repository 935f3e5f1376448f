//! skillscape-core: Quiz sessions, scoring, and content organization.
//!
//! This crate holds the assessment-to-organization pipeline: the session
//! store, the scorer, the organizer, and the service that sequences them.
//! Collaborators (quiz generation, metadata extraction, summaries) are
//! reached through the traits in [`traits`].

pub mod error;
pub mod model;
pub mod organizer;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;

pub use error::{Stage, StoreError, TriageError};
pub use pipeline::{ContentInput, TriageService};
pub use scoring::{Scorer, ScoringConfig};
pub use session::{InMemorySessionStore, SessionStore};
