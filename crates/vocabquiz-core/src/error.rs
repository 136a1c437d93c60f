//! Engine error types.
//!
//! Invalid arguments are raised synchronously and never swallowed. Score
//! file read and write failures do not appear here: the store logs them and
//! degrades instead of failing a round in progress.

use thiserror::Error;

/// Result type alias using `QuizError`.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors raised by the session engine, score store and vocabulary lookup.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Session points outside `0..=max`.
    #[error("session points must be between 0 and {max}, got {points}")]
    InvalidSessionPoints { points: i64, max: u32 },

    /// Empty or whitespace-only username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// Username containing a field separator or line break.
    #[error("username cannot contain commas or line breaks: {0:?}")]
    InvalidUsername(String),

    /// Registration rejected before touching the store.
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    /// A registration for a username that already has a record.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// The controller was driven out of order (e.g. an answer while idle).
    #[error("{0}")]
    OutOfTurn(String),

    /// No vocabulary is registered for the requested pair.
    #[error("no vocabulary for language '{language}' at level '{level}'")]
    VocabularyNotFound { language: String, level: String },

    /// A registered vocabulary source failed to produce words.
    #[error("failed to load vocabulary {language}/{level}: {message}")]
    VocabularyLoad {
        language: String,
        level: String,
        message: String,
    },

    /// I/O failure on an operation that cannot degrade (registration).
    #[error("score store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Returns `true` for programming or input errors that the caller must fix.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            QuizError::InvalidSessionPoints { .. }
                | QuizError::EmptyUsername
                | QuizError::InvalidUsername(_)
                | QuizError::InvalidRegistration(_)
                | QuizError::UsernameTaken(_)
                | QuizError::OutOfTurn(_)
        )
    }

    /// Returns `true` when the requested vocabulary does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuizError::VocabularyNotFound { .. })
    }
}
