//! Scripted question boundary for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::boundary::{AnswerPublisher, QuestionBoundary};
use crate::session::Question;

/// How the scripted player answers one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Correct,
    Wrong,
    /// Drop the publisher without answering.
    Abandon,
}

/// A boundary that answers from a script instead of asking a person.
///
/// Questions past the end of the script get the fallback answer.
pub struct ScriptedBoundary {
    script: Vec<ScriptedAnswer>,
    fallback: ScriptedAnswer,
    /// Number of questions presented.
    call_count: AtomicU32,
    /// Every question presented, in order.
    presented: Mutex<Vec<Question>>,
}

impl ScriptedBoundary {
    /// Follow `script`, then answer correctly.
    pub fn new(script: Vec<ScriptedAnswer>) -> Self {
        Self {
            script,
            fallback: ScriptedAnswer::Correct,
            call_count: AtomicU32::new(0),
            presented: Mutex::new(Vec::new()),
        }
    }

    pub fn always_correct() -> Self {
        Self::new(Vec::new())
    }

    pub fn always_wrong() -> Self {
        Self::new(Vec::new()).with_fallback(ScriptedAnswer::Wrong)
    }

    pub fn with_fallback(mut self, fallback: ScriptedAnswer) -> Self {
        self.fallback = fallback;
        self
    }

    /// Answer the first `n` questions as scripted, then abandon.
    pub fn abandon_after(mut self, n: usize) -> Self {
        self.script.resize(n, self.fallback);
        self.fallback = ScriptedAnswer::Abandon;
        self
    }

    /// Get the number of questions presented so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the questions presented so far.
    pub fn presented(&self) -> Vec<Question> {
        self.presented
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl QuestionBoundary for ScriptedBoundary {
    async fn present(&self, question: &Question, answer: AnswerPublisher) -> anyhow::Result<()> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed) as usize;
        self.presented
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(question.clone());

        let correct = question.correct_answer();
        match self.script.get(n).copied().unwrap_or(self.fallback) {
            ScriptedAnswer::Correct => answer.submit(correct, correct),
            ScriptedAnswer::Wrong => answer.submit(wrong_response(question), correct),
            ScriptedAnswer::Abandon => drop(answer),
        }
        Ok(())
    }
}

/// A wrong option when one exists, otherwise text no translation matches.
fn wrong_response(question: &Question) -> String {
    let correct = question.correct_answer().to_lowercase();
    question
        .option_texts()
        .into_iter()
        .find(|text| text.to_lowercase() != correct)
        .map(str::to_string)
        .unwrap_or_else(|| format!("not {correct}"))
}
