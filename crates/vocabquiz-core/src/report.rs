//! Round reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{AnswerRecord, RoundOutcome};

/// Everything that happened in one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    /// Unique report identifier.
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Player, if the round was played for one.
    pub username: Option<String>,
    pub language: String,
    pub level: String,
    /// Scored answers in question order.
    pub answers: Vec<AnswerRecord>,
    pub session_points: u32,
    pub questions_asked: u32,
    /// Stored total after the round; `None` without a user or when the
    /// round was abandoned.
    #[serde(default)]
    pub high_score: Option<u32>,
    /// Whether the new total reached the score file.
    #[serde(default)]
    pub persisted: bool,
    /// `false` when the round was abandoned before its last question.
    pub completed: bool,
}

/// Fields shared by every report, known before the round ends.
#[derive(Debug, Clone)]
pub(crate) struct ReportHeader {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub username: Option<String>,
    pub language: String,
    pub level: String,
}

impl RoundReport {
    pub(crate) fn finish(
        header: ReportHeader,
        answers: Vec<AnswerRecord>,
        outcome: Option<RoundOutcome>,
    ) -> Self {
        let session_points = answers.iter().filter(|a| a.correct).count() as u32;
        let questions_asked = answers.len() as u32;
        let (high_score, persisted) = match outcome.as_ref().and_then(|o| o.score_update.as_ref())
        {
            Some(update) => (Some(update.score), update.persisted),
            None => (None, false),
        };
        Self {
            id: header.id,
            started_at: header.started_at,
            finished_at: Utc::now(),
            username: header.username,
            language: header.language,
            level: header.level,
            answers,
            session_points,
            questions_asked,
            high_score,
            persisted,
            completed: outcome.is_some(),
        }
    }

    /// Fraction of answers that were correct, 0.0 for an empty round.
    pub fn accuracy(&self) -> f64 {
        if self.questions_asked == 0 {
            0.0
        } else {
            f64::from(self.session_points) / f64::from(self.questions_asked)
        }
    }

    /// Answers the player got wrong.
    pub fn missed(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.answers.iter().filter(|a| !a.correct)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: RoundReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
