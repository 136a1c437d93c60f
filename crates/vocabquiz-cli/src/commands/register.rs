//! The `vocabquiz register` command.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::store::ScoreStore;

pub fn execute(
    user: String,
    password: String,
    email: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = ScoreStore::new(&config.score_file);

    store.register(&user, &password, &email)?;
    println!("Registered {}.", user.trim());
    println!("Play with: vocabquiz play --user {} --password <password>", user.trim());
    Ok(())
}
