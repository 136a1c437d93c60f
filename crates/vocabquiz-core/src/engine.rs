//! Round driver.
//!
//! Connects a [`SessionController`] to a [`QuestionBoundary`]: each question
//! gets its own answer channel, the controller scores whatever arrives, and
//! the finished round is summarized as a [`RoundReport`].

use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::boundary::{AnswerPublisher, QuestionBoundary};
use crate::report::{ReportHeader, RoundReport};
use crate::session::{AnswerRecord, Question, SessionController, Step};

/// Progress reporting trait.
pub trait RoundReporter: Send + Sync {
    fn on_question(&self, question: &Question);
    fn on_answer(&self, record: &AnswerRecord);
    fn on_round_complete(&self, report: &RoundReport);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl RoundReporter for NoopReporter {
    fn on_question(&self, _: &Question) {}
    fn on_answer(&self, _: &AnswerRecord) {}
    fn on_round_complete(&self, _: &RoundReport) {}
}

/// Play one round from start to finish.
///
/// If the boundary drops a publisher without submitting, the round is
/// abandoned: the report is returned with `completed == false` and no score
/// is saved.
pub async fn play_round<R: Rng>(
    controller: &mut SessionController<R>,
    boundary: &dyn QuestionBoundary,
    reporter: &dyn RoundReporter,
) -> Result<RoundReport> {
    let config = controller.config();
    let header = ReportHeader {
        id: Uuid::new_v4(),
        started_at: Utc::now(),
        username: config.user.as_ref().map(|u| u.username().to_string()),
        language: config.language.clone(),
        level: config.level.clone(),
    };

    let mut step = controller.start()?;
    let outcome = loop {
        let question = match step {
            Step::Ask(question) => question,
            Step::Ended(outcome) => break Some(outcome),
        };

        reporter.on_question(&question);
        let (publisher, answer) = AnswerPublisher::channel();
        boundary.present(&question, publisher).await?;

        let Ok(event) = answer.await else {
            tracing::info!(
                "round abandoned at question {} of {}",
                question.index + 1,
                controller.config().round_length()
            );
            break None;
        };

        step = controller.on_answer_submitted(&event)?;
        if let Some(record) = controller.answers().last() {
            reporter.on_answer(record);
        }
    };

    let report = RoundReport::finish(header, controller.answers().to_vec(), outcome);
    reporter.on_round_complete(&report);
    Ok(report)
}
