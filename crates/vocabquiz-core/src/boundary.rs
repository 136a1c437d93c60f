//! The seam between the engine and whatever shows questions to a person.
//!
//! A boundary receives each question together with an [`AnswerPublisher`].
//! Submitting consumes the publisher, so a question can be answered at
//! most once; dropping it unsubmitted abandons the round.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::session::{AnswerEvent, Question};

/// Something that can show a question and report the answer.
#[async_trait]
pub trait QuestionBoundary: Send + Sync {
    /// Show `question`. The answer may be published before this returns or
    /// later from another task.
    async fn present(&self, question: &Question, answer: AnswerPublisher) -> anyhow::Result<()>;
}

/// Single-use handle for publishing the "answer submitted" event.
#[derive(Debug)]
pub struct AnswerPublisher {
    tx: oneshot::Sender<AnswerEvent>,
}

impl AnswerPublisher {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<AnswerEvent>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Publish the user's response and the answer it is checked against.
    pub fn submit(self, user_response: impl Into<String>, correct_answer: impl Into<String>) {
        let event = AnswerEvent::new(user_response, correct_answer);
        if self.tx.send(event).is_err() {
            tracing::warn!("answer submitted after the round stopped listening");
        }
    }
}
