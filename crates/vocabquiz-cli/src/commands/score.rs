//! The `vocabquiz score` command.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::store::ScoreStore;

pub fn execute(user: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    anyhow::ensure!(!user.trim().is_empty(), "username cannot be empty");

    let store = ScoreStore::new(&config.score_file);
    println!("{}: {}", user.trim(), store.read(&user));
    Ok(())
}
