//! Flat-file score store.
//!
//! One record per line, comma separated, optionally padded with a space
//! after each comma:
//!
//! ```text
//! ana,10
//! Carlos, 5, pw123, carlos@x.com
//! ```
//!
//! Two fields form a guest record, four a registered one. Reads never fail:
//! I/O and parse problems are logged and read as a score of 0. Updates
//! rewrite the whole file into a temp file beside it and rename it over the
//! original. There is no locking; concurrent writers can lose updates.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{QuizError, Result};
use crate::model::{check_username, ScoreRecord, User, MAX_QUESTIONS};

/// Minimum password length accepted by [`ScoreStore::register`].
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Outcome of a score write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreUpdate {
    pub username: String,
    /// Score stored before the write (0 for a new record).
    pub previous: u32,
    /// Score the write attempted to store.
    pub score: u32,
    /// `false` when the file could not be read or replaced.
    pub persisted: bool,
}

/// Score store backed by a text file.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check that a round's points are within `0..=MAX_QUESTIONS`.
    pub fn validate(session_points: i64) -> Result<u32> {
        if !(0..=i64::from(MAX_QUESTIONS)).contains(&session_points) {
            return Err(QuizError::InvalidSessionPoints {
                points: session_points,
                max: MAX_QUESTIONS,
            });
        }
        Ok(session_points as u32)
    }

    /// Score for `username`, or 0 if absent or unreadable.
    pub fn read(&self, username: &str) -> u32 {
        let key = username.trim();
        let Some(content) = self.load() else {
            return 0;
        };

        for line in content.lines() {
            let fields = split_fields(line);
            if fields.len() >= 2 && fields[0] == key {
                return match fields[1].parse::<u32>() {
                    Ok(score) => score,
                    Err(e) => {
                        tracing::error!(
                            "invalid score '{}' for {key} in {}: {e}",
                            fields[1],
                            self.path.display()
                        );
                        0
                    }
                };
            }
        }
        0
    }

    /// Add a round's points to the stored score.
    ///
    /// Invalid points or usernames are rejected before the file is touched.
    pub fn update(&self, username: &str, session_points: i64) -> Result<ScoreUpdate> {
        check_username(username)?;
        let points = Self::validate(session_points)?;
        let current = self.read(username);
        self.store_score(username, current.saturating_add(points))
    }

    /// [`update`](Self::update), then copy the new score onto `user`.
    ///
    /// The in-memory score changes even if the file write failed; check
    /// [`ScoreUpdate::persisted`].
    pub fn update_user(&self, user: &mut User, session_points: i64) -> Result<ScoreUpdate> {
        let outcome = self.update(user.username(), session_points)?;
        user.high_score = outcome.score;
        Ok(outcome)
    }

    /// Replace or insert the record for `username` with `score`.
    ///
    /// Guest records stay guest records and registered ones keep their
    /// credentials. Every other line is copied verbatim; later duplicates of
    /// the target are dropped.
    pub fn store_score(&self, username: &str, score: u32) -> Result<ScoreUpdate> {
        check_username(username)?;
        let key = username.trim();

        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                tracing::error!(
                    "failed to update score for {key}: cannot read {}: {e}",
                    self.path.display()
                );
                return Ok(ScoreUpdate {
                    username: key.to_string(),
                    previous: 0,
                    score,
                    persisted: false,
                });
            }
        };

        let mut rewritten = String::with_capacity(existing.len() + key.len() + 8);
        let mut previous = None;
        for line in existing.lines() {
            let fields = split_fields(line);
            if fields.len() >= 2 && fields[0] == key {
                if previous.is_some() {
                    tracing::warn!("dropping duplicate record for {key}");
                    continue;
                }
                previous = Some(fields[1].parse::<u32>().unwrap_or(0));
                rewritten.push_str(&replace_score(&fields, score));
            } else {
                rewritten.push_str(line);
            }
            rewritten.push('\n');
        }

        if previous.is_none() {
            let record = ScoreRecord::Guest {
                username: key.to_string(),
                score,
            };
            rewritten.push_str(&record.to_line());
            rewritten.push('\n');
        }

        let persisted = match self.replace_contents(&rewritten) {
            Ok(()) => {
                tracing::info!("score for {key} updated to {score}");
                true
            }
            Err(e) => {
                tracing::error!("failed to update score for {key}: {e:#}");
                false
            }
        };

        Ok(ScoreUpdate {
            username: key.to_string(),
            previous: previous.unwrap_or(0),
            score,
            persisted,
        })
    }

    /// Set the stored score for `username` back to 0.
    pub fn reset(&self, username: &str) -> Result<ScoreUpdate> {
        self.store_score(username, 0)
    }

    /// Append a guest record unless `username` already has one.
    ///
    /// Returns `true` if a record was added.
    pub fn ensure_guest(&self, username: &str) -> Result<bool> {
        check_username(username)?;
        let key = username.trim();
        if self.find(key).is_some() {
            return Ok(false);
        }
        self.append(&ScoreRecord::Guest {
            username: key.to_string(),
            score: 0,
        })?;
        Ok(true)
    }

    /// Append a registered record with a zero score.
    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<()> {
        check_username(username)?;
        let key = username.trim();

        for (name, value) in [("password", password), ("email", email)] {
            if value.contains([',', '\n', '\r']) {
                return Err(QuizError::InvalidRegistration(format!(
                    "{name} cannot contain commas or line breaks"
                )));
            }
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(QuizError::InvalidRegistration(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        if !is_valid_email(email) {
            return Err(QuizError::InvalidRegistration(format!(
                "not a valid email address: {email}"
            )));
        }
        if self.find(key).is_some() {
            return Err(QuizError::UsernameTaken(key.to_string()));
        }

        self.append(&ScoreRecord::Registered {
            username: key.to_string(),
            score: 0,
            password: password.to_string(),
            email: email.to_string(),
        })?;
        tracing::info!("registered {key}");
        Ok(())
    }

    /// Whether `username` has a registered record with this password.
    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        matches!(
            self.find(username.trim()),
            Some(ScoreRecord::Registered { password: stored, .. }) if stored == password
        )
    }

    /// All parsable records in file order.
    pub fn records(&self) -> Vec<ScoreRecord> {
        let Some(content) = self.load() else {
            return Vec::new();
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match parse_record(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("skipping score line '{line}': {e}");
                    None
                }
            })
            .collect()
    }

    fn find(&self, key: &str) -> Option<ScoreRecord> {
        let content = self.load()?;
        content
            .lines()
            .find(|line| split_fields(line).first() == Some(&key))
            .and_then(|line| parse_record(line).ok())
    }

    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("score file {} does not exist yet", self.path.display());
                None
            }
            Err(e) => {
                tracing::error!("failed to read score file {}: {e}", self.path.display());
                None
            }
        }
    }

    fn append(&self, record: &ScoreRecord) -> Result<()> {
        let needs_newline = fs::read_to_string(&self.path)
            .map(|c| !c.is_empty() && !c.ends_with('\n'))
            .unwrap_or(false);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_newline {
            file.write_all(b"\n")?;
        }
        writeln!(file, "{}", record.to_line())?;
        Ok(())
    }

    fn replace_contents(&self, content: &str) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .context("failed to write temp score file")?;
        tmp.as_file()
            .sync_all()
            .context("failed to flush temp score file")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn record_from_fields(fields: &[&str], score: u32) -> ScoreRecord {
    if fields.len() >= 4 {
        ScoreRecord::Registered {
            username: fields[0].to_string(),
            score,
            password: fields[2].to_string(),
            email: fields[3].to_string(),
        }
    } else {
        ScoreRecord::Guest {
            username: fields[0].to_string(),
            score,
        }
    }
}

/// Rebuild a line with its score field replaced. Every other field is kept.
fn replace_score(fields: &[&str], score: u32) -> String {
    if !matches!(fields.len(), 2 | 4) {
        tracing::warn!(
            "score line for {} has {} fields, expected 2 or 4",
            fields[0],
            fields.len()
        );
    }
    let score = score.to_string();
    let mut line = String::from(fields[0]);
    line.push(',');
    line.push_str(&score);
    for field in &fields[2..] {
        line.push(',');
        line.push_str(field);
    }
    line
}

fn parse_record(line: &str) -> anyhow::Result<ScoreRecord> {
    let fields = split_fields(line);
    anyhow::ensure!(fields.len() >= 2, "expected at least 2 fields");
    anyhow::ensure!(!fields[0].is_empty(), "empty username");
    let score = fields[1]
        .parse::<u32>()
        .with_context(|| format!("invalid score '{}'", fields[1]))?;
    Ok(record_from_fields(&fields, score))
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "_+&*-".contains(c))
        });

    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok = labels.len() >= 2
        && labels[..labels.len() - 1].iter().all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels
            .last()
            .is_some_and(|tld| (2..=7).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic()));

    local_ok && domain_ok
}
