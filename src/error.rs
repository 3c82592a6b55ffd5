use thiserror::Error;

use crate::fact::{AttributeKey, SubjectId};

/// Errors raised by the planner.
///
/// Only malformed worlds and I/O produce errors. A search that runs out of
/// nodes or budget is a normal outcome and is reported through
/// [`SearchOutcome`](crate::SearchOutcome) instead.
///
/// # Examples
///
/// ```
/// use goap_rooms::{AttributeKey, PlannerError};
///
/// let error = PlannerError::MissingFact {
///     subject: "Access Door".to_string(),
///     key: AttributeKey::Portal,
/// };
/// assert_eq!(
///     format!("{}", error),
///     "Subject 'Access Door' has no 'portal' fact"
/// );
/// ```
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A fact the catalogue relies on is absent from the subject
    #[error("Subject '{subject}' has no '{key}' fact")]
    MissingFact {
        /// Subject that was looked up
        subject: SubjectId,
        /// Key that was missing
        key: AttributeKey,
    },

    /// A fact exists but holds a value of the wrong shape
    #[error("Subject '{subject}' has a '{key}' fact that is not {expected}")]
    UnexpectedValue {
        /// Subject that was looked up
        subject: SubjectId,
        /// Key whose value had the wrong shape
        key: AttributeKey,
        /// Human readable description of the expected shape
        expected: &'static str,
    },

    /// A reference names a subject that is not in the world
    #[error("Unknown subject: {0}")]
    UnknownSubject(SubjectId),

    /// A plan step could not run against the world it was replayed on
    #[error("Action precondition not met: {0}")]
    PreconditionNotMet(String),

    /// A world definition failed validation while being seeded
    #[error("Invalid world definition: {0}")]
    InvalidWorld(String),

    /// A wrapper around standard IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A wrapper around serde_json serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
