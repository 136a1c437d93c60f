//! Core data model types for vocabquiz.
//!
//! Words, users, question types and the persisted score record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QuizError, Result};

/// Number of questions in a full round.
pub const MAX_QUESTIONS: u32 = 15;

/// A word and its translation. Value equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    /// The word in the language being learned.
    pub original: String,
    /// The translation the user must produce or pick.
    pub translation: String,
}

impl Word {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.original, self.translation)
    }
}

/// The two kinds of question a round can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Translation,
}

impl QuestionType {
    /// All question types, in the order the controller draws from.
    pub const ALL: [QuestionType; 2] = [QuestionType::MultipleChoice, QuestionType::Translation];
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple choice"),
            QuestionType::Translation => write!(f, "translation"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple choice" | "multiple_choice" | "mc" => Ok(QuestionType::MultipleChoice),
            "translation" => Ok(QuestionType::Translation),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A learner and their preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    /// Cumulative score across all rounds.
    pub high_score: u32,
    pub selected_language: String,
    pub selected_level: String,
}

impl User {
    /// Create a user with a zero score. Rejects empty usernames.
    pub fn new(
        username: impl Into<String>,
        language: impl Into<String>,
        level: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        check_username(&username)?;
        Ok(Self {
            username,
            high_score: 0,
            selected_language: language.into(),
            selected_level: level.into(),
        })
    }

    /// Create a user whose high score is read from the store.
    pub fn load(
        store: &crate::store::ScoreStore,
        username: impl Into<String>,
        language: impl Into<String>,
        level: impl Into<String>,
    ) -> Result<Self> {
        let mut user = Self::new(username, language, level)?;
        user.high_score = store.read(&user.username);
        Ok(user)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<()> {
        let username = username.into();
        check_username(&username)?;
        self.username = username;
        Ok(())
    }

    /// Change the language and level used for the next round.
    pub fn select(&mut self, language: impl Into<String>, level: impl Into<String>) {
        self.selected_language = language.into();
        self.selected_level = level.into();
    }
}

pub(crate) fn check_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(QuizError::EmptyUsername);
    }
    if username.contains([',', '\n', '\r']) {
        return Err(QuizError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// One line of the score file.
#[derive(Clone, PartialEq, Eq)]
pub enum ScoreRecord {
    /// `username, score`
    Guest { username: String, score: u32 },
    /// `username, score, password, email`
    Registered {
        username: String,
        score: u32,
        password: String,
        email: String,
    },
}

// Passwords are kept out of logs.
impl fmt::Debug for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreRecord::Guest { username, score } => f
                .debug_struct("Guest")
                .field("username", username)
                .field("score", score)
                .finish(),
            ScoreRecord::Registered {
                username,
                score,
                password: _,
                email,
            } => f
                .debug_struct("Registered")
                .field("username", username)
                .field("score", score)
                .field("password", &"***")
                .field("email", email)
                .finish(),
        }
    }
}

impl ScoreRecord {
    pub fn username(&self) -> &str {
        match self {
            ScoreRecord::Guest { username, .. } | ScoreRecord::Registered { username, .. } => {
                username
            }
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            ScoreRecord::Guest { score, .. } | ScoreRecord::Registered { score, .. } => *score,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, ScoreRecord::Registered { .. })
    }

    /// Serialize to a score file line (no trailing newline).
    pub fn to_line(&self) -> String {
        match self {
            ScoreRecord::Guest { username, score } => format!("{username},{score}"),
            ScoreRecord::Registered {
                username,
                score,
                password,
                email,
            } => format!("{username},{score},{password},{email}"),
        }
    }
}
