//! Translation key/value maps and their loading rules.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::warn;

use crate::prefs::DEFAULT_LANGUAGE;

/// A flat key→string map for one language.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    map: HashMap<String, String>,
}

impl Translations {
    /// Wrap an already-parsed map.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// The empty map, used when every fallback fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a key, falling back to the caller's default label.
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.map.get(key).map(String::as_str).unwrap_or(default)
    }

    /// Number of keys in the map.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no keys are loaded.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Loads per-language translation documents from a directory.
#[derive(Debug, Clone)]
pub struct TranslationDir {
    root: PathBuf,
}

impl TranslationDir {
    /// Loader rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn language_path(&self, language: &str) -> PathBuf {
        self.root.join(format!("{language}.json"))
    }

    fn read_language(&self, language: &str) -> Result<Translations> {
        let path = self.language_path(language);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let map = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Translations::from_map(map))
    }

    /// Load a language with the fallback chain: requested language, then
    /// the default language, then the empty map. Failures are logged and
    /// never surface as errors.
    pub fn load(&self, language: &str) -> Translations {
        match self.read_language(language) {
            Ok(translations) => translations,
            Err(err) => {
                warn!("Failed to load {language} translations: {err:#}");
                if language == DEFAULT_LANGUAGE {
                    return Translations::empty();
                }
                match self.read_language(DEFAULT_LANGUAGE) {
                    Ok(translations) => translations,
                    Err(fallback_err) => {
                        warn!("Failed to load fallback translations: {fallback_err:#}");
                        Translations::empty()
                    }
                }
            }
        }
    }

    /// Language codes available in the directory, sorted; the default
    /// language is always offered even when the directory is missing.
    pub fn available_languages(&self) -> Vec<String> {
        let mut languages = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.root) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    languages.push(stem.to_string());
                }
            }
        }
        if !languages.iter().any(|lang| lang == DEFAULT_LANGUAGE) {
            languages.push(DEFAULT_LANGUAGE.to_string());
        }
        languages.sort();
        languages.dedup();
        languages
    }

    /// Root directory of the loader.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_language(root: &Path, language: &str, body: &str) {
        fs::write(root.join(format!("{language}.json")), body).expect("write fixture");
    }

    #[test]
    fn loads_requested_language() {
        let dir = tempdir().expect("tempdir");
        write_language(dir.path(), "de", r#"{"buy-now": "Jetzt kaufen"}"#);
        let loader = TranslationDir::new(dir.path());

        let translations = loader.load("de");
        assert_eq!(translations.get("buy-now", "Buy Now"), "Jetzt kaufen");
        assert_eq!(translations.get("missing-key", "Fallback"), "Fallback");
    }

    #[test]
    fn falls_back_to_default_language() {
        let dir = tempdir().expect("tempdir");
        write_language(dir.path(), "en", r#"{"buy-now": "Buy Now"}"#);
        let loader = TranslationDir::new(dir.path());

        let translations = loader.load("fr");
        assert_eq!(translations.get("buy-now", "?"), "Buy Now");
    }

    #[test]
    fn falls_back_to_empty_when_default_missing() {
        let dir = tempdir().expect("tempdir");
        let loader = TranslationDir::new(dir.path());

        let translations = loader.load("fr");
        assert!(translations.is_empty());
        assert_eq!(translations.get("buy-now", "Buy Now"), "Buy Now");
    }

    #[test]
    fn corrupt_document_uses_fallback_chain() {
        let dir = tempdir().expect("tempdir");
        write_language(dir.path(), "de", "{broken");
        write_language(dir.path(), "en", r#"{"buy-now": "Buy Now"}"#);
        let loader = TranslationDir::new(dir.path());

        assert_eq!(loader.load("de").get("buy-now", "?"), "Buy Now");
    }

    #[test]
    fn lists_available_languages_sorted() {
        let dir = tempdir().expect("tempdir");
        write_language(dir.path(), "sv", "{}");
        write_language(dir.path(), "de", "{}");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write fixture");
        let loader = TranslationDir::new(dir.path());

        assert_eq!(loader.available_languages(), vec!["de", "en", "sv"]);
    }

    #[test]
    fn default_language_offered_when_directory_missing() {
        let loader = TranslationDir::new("/nonexistent/translations");
        assert_eq!(loader.available_languages(), vec!["en"]);
    }
}
