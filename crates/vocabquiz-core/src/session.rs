//! The round state machine.
//!
//! `Idle -> Asking -> Scoring -> (Asking | Ended)`. The controller never
//! talks to a UI: [`SessionController::start`] and
//! [`SessionController::on_answer_submitted`] return the next [`Step`],
//! either a question to show or the round's outcome.
//!
//! Invariant while a round runs:
//! `session_points <= question_index <= min(MAX_QUESTIONS, pool size)`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::distractor::{generate_options, supports_full_options};
use crate::error::{QuizError, Result};
use crate::model::{QuestionType, User, Word, MAX_QUESTIONS};
use crate::store::{ScoreStore, ScoreUpdate};

/// Everything a round needs, built explicitly by the caller.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pool to draw questions from.
    pub words: Vec<Word>,
    /// Player whose score is saved at the end; `None` skips saving.
    pub user: Option<User>,
    pub language: String,
    pub level: String,
}

impl SessionConfig {
    pub fn new(words: Vec<Word>, user: Option<User>) -> Self {
        let (language, level) = user
            .as_ref()
            .map(|u| (u.selected_language.clone(), u.selected_level.clone()))
            .unwrap_or_default();
        Self {
            words,
            user,
            language,
            level,
        }
    }

    /// Number of questions a round over this pool asks.
    pub fn round_length(&self) -> u32 {
        MAX_QUESTIONS.min(u32::try_from(self.words.len()).unwrap_or(u32::MAX))
    }
}

/// A question handed to the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Zero-based position in the round.
    pub index: u32,
    pub word: Word,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick the translation from `options` (correct word included once).
    MultipleChoice { options: Vec<Word> },
    /// Type the translation.
    Translation,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::Translation => QuestionType::Translation,
        }
    }

    /// The word to translate.
    pub fn prompt(&self) -> &str {
        &self.word.original
    }

    pub fn correct_answer(&self) -> &str {
        &self.word.translation
    }

    /// Option texts for multiple choice; empty for translation questions.
    pub fn option_texts(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => {
                options.iter().map(|w| w.translation.as_str()).collect()
            }
            QuestionKind::Translation => Vec::new(),
        }
    }
}

/// The "answer submitted" event published by the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub user_response: String,
    pub correct_answer: String,
}

impl AnswerEvent {
    pub fn new(user_response: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            user_response: user_response.into(),
            correct_answer: correct_answer.into(),
        }
    }

    /// Case-insensitive exact comparison; whitespace is significant.
    pub fn is_correct(&self) -> bool {
        self.user_response.to_lowercase() == self.correct_answer.to_lowercase()
    }
}

/// One scored answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: u32,
    pub prompt: String,
    pub question_type: QuestionType,
    pub user_response: String,
    pub correct_answer: String,
    pub correct: bool,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    pub session_points: u32,
    pub questions_asked: u32,
    /// `None` when there was no user to save for.
    pub score_update: Option<ScoreUpdate>,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Ask(Question),
    Ended(RoundOutcome),
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Asking(Question),
    Scoring,
    Ended,
}

/// Drives one round over a word pool.
#[derive(Debug)]
pub struct SessionController<R: Rng = ChaCha8Rng> {
    config: SessionConfig,
    store: ScoreStore,
    rng: R,
    state: SessionState,
    session_points: u32,
    question_index: u32,
    answers: Vec<AnswerRecord>,
}

impl SessionController<ChaCha8Rng> {
    /// Controller with an entropy-seeded generator.
    pub fn new(config: SessionConfig, store: ScoreStore) -> Self {
        Self::with_rng(config, store, ChaCha8Rng::from_entropy())
    }

    /// Controller whose word, question-type and option choices are
    /// reproducible.
    pub fn with_seed(config: SessionConfig, store: ScoreStore, seed: u64) -> Self {
        Self::with_rng(config, store, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SessionController<R> {
    pub fn with_rng(config: SessionConfig, store: ScoreStore, rng: R) -> Self {
        if !config.words.is_empty() && !supports_full_options(&config.words) {
            tracing::warn!(
                "word pool has fewer than 4 distinct words; multiple choice questions will have fewer options"
            );
        }
        Self {
            config,
            store,
            rng,
            state: SessionState::Idle,
            session_points: 0,
            question_index: 0,
            answers: Vec::new(),
        }
    }

    /// Begin the round with question 0.
    pub fn start(&mut self) -> Result<Step> {
        if self.state != SessionState::Idle {
            return Err(QuizError::OutOfTurn("round already started".into()));
        }
        tracing::debug!(
            "starting round of {} questions for {}",
            self.config.round_length(),
            self.username().unwrap_or("<no user>")
        );
        self.next_question()
    }

    /// Score an answer and move to the next question or the end.
    ///
    /// This is the only place `session_points` changes.
    pub fn on_answer_submitted(&mut self, event: &AnswerEvent) -> Result<Step> {
        let question = match std::mem::replace(&mut self.state, SessionState::Scoring) {
            SessionState::Asking(question) => question,
            other => {
                let message = format!("answer submitted while {}", state_name(&other));
                self.state = other;
                return Err(QuizError::OutOfTurn(message));
            }
        };

        let correct = event.is_correct();
        if correct {
            self.session_points += 1;
        }
        self.answers.push(AnswerRecord {
            question_index: question.index,
            prompt: question.word.original.clone(),
            question_type: question.question_type(),
            user_response: event.user_response.clone(),
            correct_answer: event.correct_answer.clone(),
            correct,
        });
        self.question_index += 1;

        self.next_question()
    }

    fn next_question(&mut self) -> Result<Step> {
        let pool = &self.config.words;
        if self.question_index >= MAX_QUESTIONS || self.question_index as usize >= pool.len() {
            self.state = SessionState::Ended;
            return self.end_round().map(Step::Ended);
        }

        // With replacement: a word may come up more than once per round.
        let word = pool[self.rng.gen_range(0..pool.len())].clone();
        let kind = match QuestionType::ALL[self.rng.gen_range(0..QuestionType::ALL.len())] {
            QuestionType::MultipleChoice => QuestionKind::MultipleChoice {
                options: generate_options(&word, pool, &mut self.rng),
            },
            QuestionType::Translation => QuestionKind::Translation,
        };

        let question = Question {
            index: self.question_index,
            word,
            kind,
        };
        tracing::debug!(
            "question {}: {} ({})",
            question.index,
            question.prompt(),
            question.question_type()
        );
        self.state = SessionState::Asking(question.clone());
        Ok(Step::Ask(question))
    }

    fn end_round(&mut self) -> Result<RoundOutcome> {
        let score_update = match self.config.user.as_mut() {
            Some(user) => Some(
                self.store
                    .update_user(user, i64::from(self.session_points))?,
            ),
            None => {
                tracing::debug!("no user for this round, score not saved");
                None
            }
        };

        tracing::info!(
            "round finished: {}/{} correct",
            self.session_points,
            self.question_index
        );

        Ok(RoundOutcome {
            session_points: self.session_points,
            questions_asked: self.question_index,
            score_update,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_points(&self) -> u32 {
        self.session_points
    }

    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    /// Answers scored so far, in order.
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The player, with the updated high score once the round has ended.
    pub fn user(&self) -> Option<&User> {
        self.config.user.as_ref()
    }

    fn username(&self) -> Option<&str> {
        self.config.user.as_ref().map(User::username)
    }
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Asking(_) => "asking",
        SessionState::Scoring => "scoring",
        SessionState::Ended => "ended",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn words(n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| Word::new(format!("palabra{i}"), format!("word{i}")))
            .collect()
    }

    fn controller(
        dir: &tempfile::TempDir,
        pool: Vec<Word>,
        username: Option<&str>,
        seed: u64,
    ) -> SessionController {
        let user = username.map(|u| User::new(u, "spanish", "beginner").unwrap());
        let store = ScoreStore::new(dir.path().join("scores.txt"));
        SessionController::with_seed(SessionConfig::new(pool, user), store, seed)
    }

    /// Answer every question, correctly when `answer_correctly(index)`.
    fn play(
        controller: &mut SessionController,
        answer_correctly: impl Fn(u32) -> bool,
    ) -> RoundOutcome {
        let mut step = controller.start().unwrap();
        loop {
            match step {
                Step::Ask(question) => {
                    assert!(controller.session_points() <= controller.question_index());
                    let response = if answer_correctly(question.index) {
                        question.correct_answer().to_uppercase()
                    } else {
                        "wrong".to_string()
                    };
                    let event = AnswerEvent::new(response, question.correct_answer());
                    step = controller.on_answer_submitted(&event).unwrap();
                }
                Step::Ended(outcome) => return outcome,
            }
        }
    }

    #[test]
    fn full_round_is_fifteen_questions() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, words(30), Some("ana"), 1);
        let outcome = play(&mut c, |_| true);
        assert_eq!(outcome.questions_asked, MAX_QUESTIONS);
        assert_eq!(outcome.session_points, MAX_QUESTIONS);
        assert_eq!(c.state(), &SessionState::Ended);
        assert_eq!(c.answers().len(), 15);
    }

    #[test]
    fn small_pool_limits_round_length() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, words(3), Some("ana"), 2);
        let outcome = play(&mut c, |i| i != 1);
        assert_eq!(outcome.questions_asked, 3);
        assert_eq!(outcome.session_points, 2);
    }

    #[test]
    fn empty_pool_ends_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, vec![], Some("ana"), 3);
        match c.start().unwrap() {
            Step::Ended(outcome) => {
                assert_eq!(outcome.questions_asked, 0);
                assert_eq!(outcome.score_update.unwrap().score, 0);
            }
            Step::Ask(_) => panic!("empty pool should not ask"),
        }
    }

    #[test]
    fn ana_scenario_accumulates_across_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.txt"));

        let mut first = controller(&dir, words(20), Some("Ana"), 10);
        let outcome = play(&mut first, |i| i < 10);
        assert_eq!(outcome.session_points, 10);
        assert_eq!(store.read("Ana"), 10);
        assert_eq!(first.user().unwrap().high_score, 10);

        let mut second = controller(&dir, words(20), Some("Ana"), 11);
        play(&mut second, |i| i % 3 == 0);
        assert_eq!(store.read("Ana"), 15);
    }

    #[test]
    fn round_without_user_skips_saving() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, words(5), None, 4);
        let outcome = play(&mut c, |_| true);
        assert_eq!(outcome.session_points, 5);
        assert!(outcome.score_update.is_none());
        assert!(!dir.path().join("scores.txt").exists());
    }

    #[test]
    fn answer_comparison_ignores_case_only() {
        assert!(AnswerEvent::new("HELLO", "hello").is_correct());
        assert!(AnswerEvent::new("Привет", "ПРИВЕТ").is_correct());
        assert!(!AnswerEvent::new("hello ", "hello").is_correct());
        assert!(!AnswerEvent::new("helo", "hello").is_correct());
    }

    #[test]
    fn answer_out_of_turn_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, words(5), Some("ana"), 5);
        let event = AnswerEvent::new("word0", "word0");

        let err = c.on_answer_submitted(&event).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(c.state(), &SessionState::Idle);
        assert_eq!(c.session_points(), 0);

        c.start().unwrap();
        assert!(c.start().is_err());
        play_rest(&mut c);
        assert!(c.on_answer_submitted(&event).is_err());
        assert_eq!(c.state(), &SessionState::Ended);
    }

    fn play_rest(c: &mut SessionController) {
        while let SessionState::Asking(question) = c.state().clone() {
            let event = AnswerEvent::new("x", question.correct_answer());
            c.on_answer_submitted(&event).unwrap();
        }
    }

    #[test]
    fn scoring_uses_event_answer() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, words(5), None, 6);
        c.start().unwrap();
        // The boundary reports both strings; the controller trusts them.
        c.on_answer_submitted(&AnswerEvent::new("Same", "same"))
            .unwrap();
        assert_eq!(c.session_points(), 1);
        assert!(c.answers()[0].correct);
    }

    #[test]
    fn multiple_choice_options_contain_the_word() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, words(15), None, 7);
        let mut step = c.start().unwrap();
        let mut saw_multiple_choice = false;
        let mut saw_translation = false;
        while let Step::Ask(question) = step {
            match &question.kind {
                QuestionKind::MultipleChoice { options } => {
                    saw_multiple_choice = true;
                    assert_eq!(options.len(), 4);
                    assert!(options.contains(&question.word));
                    assert!(question.option_texts().contains(&question.correct_answer()));
                }
                QuestionKind::Translation => {
                    saw_translation = true;
                    assert!(question.option_texts().is_empty());
                }
            }
            let event = AnswerEvent::new("", question.correct_answer());
            step = c.on_answer_submitted(&event).unwrap();
        }
        assert!(saw_multiple_choice && saw_translation);
    }

    #[test]
    fn same_seed_same_round() {
        let dir = tempfile::tempdir().unwrap();
        let questions = |seed| {
            let mut c = controller(&dir, words(12), None, seed);
            let mut asked = Vec::new();
            let mut step = c.start().unwrap();
            while let Step::Ask(question) = step {
                let event = AnswerEvent::new("", question.correct_answer());
                asked.push(question);
                step = c.on_answer_submitted(&event).unwrap();
            }
            asked
        };
        assert_eq!(questions(99), questions(99));
        assert_ne!(questions(99), questions(100));
    }

    #[test]
    fn words_are_drawn_with_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let mut saw_repeat = false;
        for seed in 0..50 {
            let mut c = controller(&dir, words(3), None, seed);
            play(&mut c, |_| false);
            let prompts: HashSet<&str> = c.answers().iter().map(|a| a.prompt.as_str()).collect();
            if prompts.len() < c.answers().len() {
                saw_repeat = true;
                break;
            }
        }
        assert!(saw_repeat, "expected at least one round to repeat a word");
    }

    #[test]
    fn round_length_is_capped() {
        assert_eq!(SessionConfig::new(words(40), None).round_length(), 15);
        assert_eq!(SessionConfig::new(words(4), None).round_length(), 4);
    }
}
