//! Plain terminal implementation of the question boundary.

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use vocabquiz_core::boundary::{AnswerPublisher, QuestionBoundary};
use vocabquiz_core::session::{Question, QuestionKind};

/// Shows questions on stdout and reads one line of stdin per answer.
///
/// End of input abandons the round.
pub struct TerminalBoundary {
    input: Mutex<Lines<BufReader<Stdin>>>,
    round_length: u32,
}

impl TerminalBoundary {
    pub fn new(round_length: u32) -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            round_length,
        }
    }
}

#[async_trait]
impl QuestionBoundary for TerminalBoundary {
    async fn present(&self, question: &Question, answer: AnswerPublisher) -> Result<()> {
        println!("\nQuestion {} of {}", question.index + 1, self.round_length);
        match &question.kind {
            QuestionKind::MultipleChoice { .. } => {
                println!("What is the translation of '{}'?", question.prompt());
                for (i, option) in question.option_texts().iter().enumerate() {
                    println!("  {}) {option}", i + 1);
                }
                print!("Your choice: ");
            }
            QuestionKind::Translation => {
                println!("Translate '{}'", question.prompt());
                print!("Your answer: ");
            }
        }
        std::io::stdout().flush()?;

        let line = self
            .input
            .lock()
            .await
            .next_line()
            .await
            .context("failed to read answer")?;

        match line {
            Some(line) => answer.submit(resolve_response(question, &line), question.correct_answer()),
            None => println!(),
        }
        Ok(())
    }
}

/// Turn a line of input into the user's response.
///
/// For multiple choice an option number selects that option; anything else
/// is taken as typed. Only the line terminator is removed.
fn resolve_response(question: &Question, line: &str) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let options = question.option_texts();
    if !options.is_empty() {
        if let Ok(choice) = line.trim().parse::<usize>() {
            if (1..=options.len()).contains(&choice) {
                return options[choice - 1].to_string();
            }
        }
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocabquiz_core::model::Word;

    fn multiple_choice() -> Question {
        Question {
            index: 0,
            word: Word::new("Gato", "Cat"),
            kind: QuestionKind::MultipleChoice {
                options: vec![
                    Word::new("Perro", "Dog"),
                    Word::new("Gato", "Cat"),
                    Word::new("Rojo", "Red"),
                ],
            },
        }
    }

    #[test]
    fn option_number_selects_option() {
        assert_eq!(resolve_response(&multiple_choice(), "2"), "Cat");
        assert_eq!(resolve_response(&multiple_choice(), " 1 "), "Dog");
    }

    #[test]
    fn out_of_range_number_is_kept_as_text() {
        assert_eq!(resolve_response(&multiple_choice(), "4"), "4");
        assert_eq!(resolve_response(&multiple_choice(), "0"), "0");
    }

    #[test]
    fn typed_option_text_is_kept() {
        assert_eq!(resolve_response(&multiple_choice(), "cat"), "cat");
    }

    #[test]
    fn translation_keeps_whitespace() {
        let question = Question {
            index: 3,
            word: Word::new("Hola", "Hello"),
            kind: QuestionKind::Translation,
        };
        assert_eq!(resolve_response(&question, "hello \r"), "hello ");
        assert_eq!(resolve_response(&question, "1"), "1");
    }
}
