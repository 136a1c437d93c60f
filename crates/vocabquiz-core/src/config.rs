//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level vocabquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Text file holding `username,score[,password,email]` lines.
    #[serde(default = "default_score_file")]
    pub score_file: PathBuf,
    /// Directory scanned for vocabulary `.toml` files.
    #[serde(default = "default_vocabulary_dir")]
    pub vocabulary_dir: PathBuf,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_level")]
    pub default_level: String,
}

fn default_score_file() -> PathBuf {
    PathBuf::from("./vocabquiz-scores.txt")
}
fn default_vocabulary_dir() -> PathBuf {
    PathBuf::from("./vocabulary")
}
fn default_language() -> String {
    "spanish".to_string()
}
fn default_level() -> String {
    "beginner".to_string()
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            score_file: default_score_file(),
            vocabulary_dir: default_vocabulary_dir(),
            default_language: default_language(),
            default_level: default_level(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vocabquiz.toml` in the current directory
/// 2. `~/.config/vocabquiz/config.toml`
///
/// Environment variable overrides: `VOCABQUIZ_SCORE_FILE`, `VOCABQUIZ_VOCABULARY_DIR`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vocabquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    Ok(apply_overrides(config, |key| std::env::var(key).ok()))
}

/// Parse a config file body.
pub fn parse_config(content: &str) -> Result<QuizConfig> {
    Ok(toml::from_str(content)?)
}

fn apply_overrides(mut config: QuizConfig, lookup: impl Fn(&str) -> Option<String>) -> QuizConfig {
    if let Some(path) = lookup("VOCABQUIZ_SCORE_FILE") {
        config.score_file = PathBuf::from(path);
    }
    if let Some(path) = lookup("VOCABQUIZ_VOCABULARY_DIR") {
        config.vocabulary_dir = PathBuf::from(path);
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vocabquiz"))
}

/// Body of the config file written by `vocabquiz init`.
pub fn sample_config() -> String {
    let config = QuizConfig::default();
    format!(
        "# vocabquiz configuration\n\
         score_file = \"{}\"\n\
         vocabulary_dir = \"{}\"\n\
         default_language = \"{}\"\n\
         default_level = \"{}\"\n",
        config.score_file.display(),
        config.vocabulary_dir.display(),
        config.default_language,
        config.default_level
    )
}
