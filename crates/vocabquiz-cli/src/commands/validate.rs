//! The `vocabquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::vocabulary::{load_word_list_directory, parse_word_list, validate_word_list};

pub fn execute(vocabulary_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let path = match vocabulary_path {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.vocabulary_dir,
    };

    let lists = if path.is_dir() {
        load_word_list_directory(&path)?
    } else {
        vec![parse_word_list(&path)?]
    };

    let mut total_warnings = 0;

    for list in &lists {
        println!(
            "Word list: {}/{} ({} words)",
            list.language,
            list.level,
            list.words.len()
        );

        let warnings = validate_word_list(list);
        for w in &warnings {
            let prefix = w
                .index
                .map(|i| format!("  [word {}]", i + 1))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if lists.is_empty() {
        println!("No word lists found in {}.", path.display());
    } else if total_warnings == 0 {
        println!("All word lists valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
