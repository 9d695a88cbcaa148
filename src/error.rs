//! Domain error type shared by the store, the review policy, the validator,
//! and the generation gateway.

use thiserror::Error;

/// Everything that can go wrong inside flashdeck's core.
///
/// The HTTP layer maps each variant onto a status code (see
/// [`crate::api::ApiError`]); the CLI just prints the message.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more AI-generated entries did not have the shape of a card.
    /// Each string describes one rejected entry.
    #[error("invalid flashcards generated: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// `/generate` was called without any notes to work from.
    #[error("notes must not be empty")]
    EmptyNotes,

    /// A grading call used something other than `correct` or `incorrect`.
    #[error("invalid review outcome '{0}', expected 'correct' or 'incorrect'")]
    InvalidOutcome(String),

    #[error("card not found: {0}")]
    NotFound(i64),

    /// The underlying SQLite operation failed.
    #[error("storage error: {0}")]
    Persistence(#[source] rusqlite::Error),

    /// A stored row could not be turned back into a card.
    #[error("unreadable stored card: {0}")]
    Corrupt(String),

    /// Grading would push the due date outside the representable range.
    #[error("cannot schedule review: {0}")]
    Schedule(String),

    /// The generation gateway failed: network, non-2xx, or unparsable output.
    #[error("generation failed: {0}")]
    Upstream(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::FromSqlConversionFailure(idx, _, source) => {
                Error::Corrupt(format!("column {idx}: {source}"))
            }
            rusqlite::Error::InvalidColumnType(idx, name, ty) => {
                Error::Corrupt(format!("column {idx} ({name}) holds {ty}"))
            }
            other => Error::Persistence(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
