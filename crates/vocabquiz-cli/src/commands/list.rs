//! The `vocabquiz list` command.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::vocabulary::VocabularyRegistry;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    if !config.vocabulary_dir.is_dir() {
        println!(
            "No vocabulary directory at {}. Run `vocabquiz init` to create one.",
            config.vocabulary_dir.display()
        );
        return Ok(());
    }

    let registry = VocabularyRegistry::from_directory(&config.vocabulary_dir)?;
    if registry.is_empty() {
        println!(
            "No word lists found in {}.",
            config.vocabulary_dir.display()
        );
        return Ok(());
    }

    let mut current_language = None;
    for key in registry.available() {
        if current_language.as_ref() != Some(&key.language) {
            println!("{}", key.language);
            current_language = Some(key.language.clone());
        }
        println!("  {}", key.level);
    }

    Ok(())
}
