//! Vocabulary word lists and the language/level registry.
//!
//! Word lists are TOML files:
//!
//! ```toml
//! [vocabulary]
//! language = "spanish"
//! level = "beginner"
//!
//! [[words]]
//! original = "Hola"
//! translation = "Hello"
//! ```
//!
//! The registry maps a normalized `(language, level)` key to a loader, so
//! adding a language means adding data, not code.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::distractor::{distinct_count, OPTION_COUNT};
use crate::error::QuizError;
use crate::model::{Word, MAX_QUESTIONS};

/// Source of word pools for a language and level.
pub trait VocabularyProvider: Send + Sync {
    /// Words for the pair, or [`QuizError::VocabularyNotFound`].
    fn words(&self, language: &str, level: &str) -> crate::error::Result<Vec<Word>>;
}

/// Normalized registry key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VocabularyKey {
    pub language: String,
    pub level: String,
}

impl VocabularyKey {
    pub fn new(language: &str, level: &str) -> Self {
        Self {
            language: language.trim().to_lowercase(),
            level: level.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for VocabularyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.level)
    }
}

/// A parsed word list file.
#[derive(Debug, Clone)]
pub struct WordList {
    pub language: String,
    pub level: String,
    pub words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct TomlWordFile {
    vocabulary: TomlVocabularyHeader,
    #[serde(default)]
    words: Vec<TomlWord>,
}

#[derive(Debug, Deserialize)]
struct TomlVocabularyHeader {
    language: String,
    level: String,
}

#[derive(Debug, Deserialize)]
struct TomlWord {
    original: String,
    translation: String,
}

/// Parse a word list file.
pub fn parse_word_list(path: &Path) -> Result<WordList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read word list: {}", path.display()))?;

    parse_word_list_str(&content, path)
}

/// Parse a word list from a string (`source_path` is used in messages).
pub fn parse_word_list_str(content: &str, source_path: &Path) -> Result<WordList> {
    let parsed: TomlWordFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    anyhow::ensure!(
        !parsed.vocabulary.language.trim().is_empty(),
        "{}: language is empty",
        source_path.display()
    );
    anyhow::ensure!(
        !parsed.vocabulary.level.trim().is_empty(),
        "{}: level is empty",
        source_path.display()
    );

    let words = parsed
        .words
        .into_iter()
        .map(|w| Word::new(w.original, w.translation))
        .collect();

    Ok(WordList {
        language: parsed.vocabulary.language,
        level: parsed.vocabulary.level,
        words,
    })
}

/// Load every word list file in a directory (recursively), in path order.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_word_list_directory(dir: &Path) -> Result<Vec<WordList>> {
    Ok(parse_directory(dir)?
        .into_iter()
        .map(|(_, list)| list)
        .collect())
}

/// Parse every `.toml` file under `dir`, paired with its path, in path order.
fn parse_directory(dir: &Path) -> Result<Vec<(PathBuf, WordList)>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    entries.sort();

    let mut lists = Vec::new();
    for path in entries {
        if path.is_dir() {
            lists.extend(parse_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_word_list(&path) {
                Ok(list) => lists.push((path, list)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(lists)
}

type Loader = Box<dyn Fn() -> Result<Vec<Word>> + Send + Sync>;

/// Lookup table from `(language, level)` to a word loader.
#[derive(Default)]
pub struct VocabularyRegistry {
    loaders: BTreeMap<VocabularyKey, Loader>,
}

impl fmt::Debug for VocabularyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularyRegistry")
            .field("keys", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader, replacing any previous one for the same pair.
    pub fn register<F>(&mut self, language: &str, level: &str, loader: F)
    where
        F: Fn() -> Result<Vec<Word>> + Send + Sync + 'static,
    {
        let key = VocabularyKey::new(language, level);
        if self.loaders.insert(key.clone(), Box::new(loader)).is_some() {
            tracing::warn!("vocabulary {key} registered twice, keeping the latest");
        }
    }

    /// Register an in-memory word list.
    pub fn register_words(&mut self, language: &str, level: &str, words: Vec<Word>) {
        self.register(language, level, move || Ok(words.clone()));
    }

    /// Register a lazy loader for every `.toml` word list under `dir`.
    ///
    /// Files are parsed once here to learn their key and again on each
    /// load, so edits are picked up between rounds.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        registry.add_directory(dir)?;
        Ok(registry)
    }

    fn add_directory(&mut self, dir: &Path) -> Result<()> {
        for (path, list) in parse_directory(dir)? {
            tracing::debug!(
                "found {} words for {}/{} in {}",
                list.words.len(),
                list.language,
                list.level,
                path.display()
            );
            self.register(&list.language, &list.level, move || {
                Ok(parse_word_list(&path)?.words)
            });
        }
        Ok(())
    }

    /// Registered pairs in sorted order.
    pub fn available(&self) -> Vec<VocabularyKey> {
        self.loaders.keys().cloned().collect()
    }

    pub fn contains(&self, language: &str, level: &str) -> bool {
        self.loaders.contains_key(&VocabularyKey::new(language, level))
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl VocabularyProvider for VocabularyRegistry {
    fn words(&self, language: &str, level: &str) -> crate::error::Result<Vec<Word>> {
        let key = VocabularyKey::new(language, level);
        let loader = self
            .loaders
            .get(&key)
            .ok_or_else(|| QuizError::VocabularyNotFound {
                language: key.language.clone(),
                level: key.level.clone(),
            })?;

        loader().map_err(|e| QuizError::VocabularyLoad {
            language: key.language.clone(),
            level: key.level.clone(),
            message: format!("{e:#}"),
        })
    }
}

/// A warning from word list validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Position of the offending word, if any.
    pub index: Option<usize>,
    pub message: String,
}

/// Check a word list for problems that degrade a round.
pub fn validate_word_list(list: &WordList) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for (i, word) in list.words.iter().enumerate() {
        if !seen.insert(word) {
            warnings.push(ValidationWarning {
                index: Some(i),
                message: format!("duplicate word: {word}"),
            });
        }
    }

    for (i, word) in list.words.iter().enumerate() {
        if word.original.trim().is_empty() || word.translation.trim().is_empty() {
            warnings.push(ValidationWarning {
                index: Some(i),
                message: "original or translation is empty".into(),
            });
        }
    }

    let distinct = distinct_count(&list.words);
    if distinct < OPTION_COUNT {
        warnings.push(ValidationWarning {
            index: None,
            message: format!(
                "only {distinct} distinct words; multiple choice needs {OPTION_COUNT} for a full option set"
            ),
        });
    }

    if list.words.len() < MAX_QUESTIONS as usize {
        warnings.push(ValidationWarning {
            index: None,
            message: format!(
                "{} words; rounds will stop after {} of {MAX_QUESTIONS} questions",
                list.words.len(),
                list.words.len()
            ),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPANISH: &str = r#"
[vocabulary]
language = "Spanish"
level = "Beginner"

[[words]]
original = "Hola"
translation = "Hello"

[[words]]
original = "Amigo"
translation = "Friend"

[[words]]
original = "Rojo"
translation = "Red"

[[words]]
original = "Gato"
translation = "Cat"
"#;

    #[test]
    fn parse_valid_word_list() {
        let list = parse_word_list_str(SPANISH, &PathBuf::from("spanish.toml")).unwrap();
        assert_eq!(list.language, "Spanish");
        assert_eq!(list.level, "Beginner");
        assert_eq!(list.words.len(), 4);
        assert_eq!(list.words[0], Word::new("Hola", "Hello"));
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_word_list_str("this is [not toml", &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_missing_header() {
        let toml = r#"
[[words]]
original = "Hola"
translation = "Hello"
"#;
        assert!(parse_word_list_str(toml, &PathBuf::from("x.toml")).is_err());
    }

    #[test]
    fn registry_lookup_is_case_insensitive() {
        let mut registry = VocabularyRegistry::new();
        registry.register_words("Spanish", "Beginner", vec![Word::new("Hola", "Hello")]);

        assert!(registry.contains("spanish", " BEGINNER "));
        let words = registry.words("SPANISH", "beginner").unwrap();
        assert_eq!(words, vec![Word::new("Hola", "Hello")]);
    }

    #[test]
    fn registry_missing_pair_is_not_found() {
        let registry = VocabularyRegistry::new();
        let err = registry.words("russian", "advanced").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("russian"));
    }

    #[test]
    fn registry_loader_failure_is_reported() {
        let mut registry = VocabularyRegistry::new();
        registry.register("spanish", "advanced", || anyhow::bail!("spreadsheet missing"));
        let err = registry.words("spanish", "advanced").unwrap_err();
        assert!(matches!(err, QuizError::VocabularyLoad { .. }));
        assert!(err.to_string().contains("spreadsheet missing"));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("spanish_beginner.toml"), SPANISH).unwrap();
        std::fs::create_dir(dir.path().join("russian")).unwrap();
        std::fs::write(
            dir.path().join("russian").join("beginner.toml"),
            "[vocabulary]\nlanguage = \"russian\"\nlevel = \"beginner\"\n\n[[words]]\noriginal = \"Привет\"\ntranslation = \"Hello\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "nope = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = VocabularyRegistry::from_directory(dir.path()).unwrap();
        let keys: Vec<String> = registry.available().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["russian/beginner", "spanish/beginner"]);
        assert_eq!(registry.words("spanish", "beginner").unwrap().len(), 4);
        assert_eq!(
            registry.words("russian", "beginner").unwrap()[0].original,
            "Привет"
        );
    }

    #[test]
    fn load_word_lists_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_spanish.toml"), SPANISH).unwrap();
        std::fs::write(dir.path().join("b_broken.toml"), "[vocabulary]\n").unwrap();

        let lists = load_word_list_directory(dir.path()).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].language, "Spanish");
    }

    #[test]
    fn load_missing_directory_fails() {
        let missing = Path::new("/definitely/not/here");
        assert!(VocabularyRegistry::from_directory(missing).is_err());
        assert!(load_word_list_directory(missing).is_err());
    }

    #[test]
    fn registry_and_loader_agree_on_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b/deep")).unwrap();
        std::fs::write(dir.path().join("b/deep/spanish.toml"), SPANISH).unwrap();
        std::fs::write(
            dir.path().join("a.toml"),
            "[vocabulary]\nlanguage = \"russian\"\nlevel = \"beginner\"\n\n[[words]]\noriginal = \"Да\"\ntranslation = \"Yes\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("b/skip.txt"), "ignored").unwrap();

        let lists = load_word_list_directory(dir.path()).unwrap();
        let languages: Vec<&str> = lists.iter().map(|l| l.language.as_str()).collect();
        assert_eq!(languages, vec!["russian", "Spanish"]);

        let registry = VocabularyRegistry::from_directory(dir.path()).unwrap();
        assert_eq!(registry.available().len(), lists.len());
        for list in &lists {
            assert!(registry.contains(&list.language, &list.level));
        }
    }

    #[test]
    fn validate_flags_small_and_duplicate_lists() {
        let list = WordList {
            language: "spanish".into(),
            level: "beginner".into(),
            words: vec![
                Word::new("Hola", "Hello"),
                Word::new("Hola", "Hello"),
                Word::new("", "Cat"),
            ],
        };
        let warnings = validate_word_list(&list);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("empty")));
        assert!(warnings.iter().any(|w| w.message.contains("distinct")));
        assert!(warnings.iter().any(|w| w.message.contains("rounds will stop")));
    }

    #[test]
    fn validate_full_list_is_clean() {
        let words = (0..15)
            .map(|i| Word::new(format!("w{i}"), format!("t{i}")))
            .collect();
        let list = WordList {
            language: "spanish".into(),
            level: "beginner".into(),
            words,
        };
        assert!(validate_word_list(&list).is_empty());
    }
}
