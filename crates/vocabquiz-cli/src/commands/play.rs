//! The `vocabquiz play` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::engine::{play_round, RoundReporter};
use vocabquiz_core::model::User;
use vocabquiz_core::report::RoundReport;
use vocabquiz_core::session::{AnswerRecord, Question, SessionConfig, SessionController};
use vocabquiz_core::store::ScoreStore;
use vocabquiz_core::vocabulary::{VocabularyProvider, VocabularyRegistry};

use crate::terminal::TerminalBoundary;

pub struct PlayArgs {
    pub user: Option<String>,
    pub password: Option<String>,
    pub language: Option<String>,
    pub level: Option<String>,
    pub seed: Option<u64>,
    pub report: Option<PathBuf>,
}

/// Console feedback after each answer and at the end of the round.
struct ConsoleReporter;

impl RoundReporter for ConsoleReporter {
    fn on_question(&self, _: &Question) {}

    fn on_answer(&self, record: &AnswerRecord) {
        if record.correct {
            println!("Correct! Well done!");
        } else {
            println!(
                "Incorrect. The correct translation is: {}",
                record.correct_answer
            );
        }
    }

    fn on_round_complete(&self, report: &RoundReport) {
        if !report.completed {
            println!(
                "\nRound abandoned after {} question(s); score not saved.",
                report.questions_asked
            );
            return;
        }

        println!(
            "\nRound complete: {}/{} correct ({:.0}%)",
            report.session_points,
            report.questions_asked,
            report.accuracy() * 100.0
        );
        match (&report.username, report.high_score) {
            (Some(name), Some(total)) if report.persisted => {
                println!("{name}'s total score: {total}");
            }
            (Some(name), Some(total)) => {
                eprintln!("Warning: could not save {name}'s score (total would be {total})");
            }
            _ => println!("Playing without a user; score not saved."),
        }

        let missed: Vec<&AnswerRecord> = report.missed().collect();
        if !missed.is_empty() {
            println!("\nWords to review:");
            for record in missed {
                println!("  {} = {}", record.prompt, record.correct_answer);
            }
        }
    }
}

pub async fn execute(args: PlayArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let language = args
        .language
        .unwrap_or_else(|| config.default_language.clone());
    let level = args.level.unwrap_or_else(|| config.default_level.clone());

    let registry = VocabularyRegistry::from_directory(&config.vocabulary_dir).with_context(|| {
        format!(
            "failed to load vocabulary (run `vocabquiz init` to create {})",
            config.vocabulary_dir.display()
        )
    })?;
    let words = registry.words(&language, &level)?;

    let store = ScoreStore::new(&config.score_file);
    let user = match args.user {
        Some(name) => {
            if let Some(password) = &args.password {
                anyhow::ensure!(
                    store.verify_credentials(&name, password),
                    "invalid username or password"
                );
            }
            let user = User::load(&store, name, &language, &level)?;
            if let Err(e) = store.ensure_guest(user.username()) {
                tracing::warn!("could not create a record for {}: {e}", user.username());
            }
            Some(user)
        }
        None => None,
    };

    let mut session = SessionConfig::new(words, user);
    session.language = language;
    session.level = level;
    let round_length = session.round_length();

    println!(
        "vocabquiz: {} {} ({} questions)",
        session.language, session.level, round_length
    );
    if let Some(user) = &session.user {
        println!("Player: {} (score {})", user.username(), user.high_score);
    }

    let mut controller = match args.seed {
        Some(seed) => SessionController::with_seed(session, store, seed),
        None => SessionController::new(session, store),
    };

    let boundary = TerminalBoundary::new(round_length);
    let report = play_round(&mut controller, &boundary, &ConsoleReporter).await?;

    if let Some(path) = &args.report {
        report.save_json(path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}
