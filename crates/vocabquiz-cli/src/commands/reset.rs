//! The `vocabquiz reset` command.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::store::ScoreStore;

pub fn execute(user: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = ScoreStore::new(&config.score_file);

    let update = store.reset(&user)?;
    anyhow::ensure!(
        update.persisted,
        "could not write {}",
        store.path().display()
    );
    println!(
        "Reset {}'s score (was {}).",
        update.username, update.previous
    );
    Ok(())
}
