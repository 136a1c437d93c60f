//! vocabquiz-core: quiz session engine, distractor generation and score store.
//!
//! A round draws up to [`model::MAX_QUESTIONS`] questions from a word pool,
//! hands each one to a [`boundary::QuestionBoundary`], scores the answers and
//! adds the points to the player's total in a flat text score file.

pub mod boundary;
pub mod config;
pub mod distractor;
pub mod engine;
pub mod error;
pub mod mock;
pub mod model;
pub mod report;
pub mod session;
pub mod store;
pub mod vocabulary;
