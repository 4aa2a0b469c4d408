//! Persisted user preferences.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Directory under the user's config dir holding the settings file.
pub const SETTINGS_DIR: &str = "brewdex";
/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Default language code.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default sort criterion string.
pub const DEFAULT_SORT: &str = "title-asc";

/// The two supported colour themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    /// Dark palette (default).
    #[default]
    Dark,
    /// Light palette.
    Light,
}

impl ThemeKind {
    /// The other theme.
    pub fn toggled(self) -> ThemeKind {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    /// Canonical key as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

/// The persisted preference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Active language code.
    #[serde(default = "default_language")]
    pub language: String,
    /// Active theme.
    #[serde(default)]
    pub theme: ThemeKind,
    /// Active sort criterion, kept as the raw string so an unrecognised
    /// persisted value degrades to the no-op sort.
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: default_language(),
            theme: ThemeKind::Dark,
            sort: default_sort(),
        }
    }
}

impl Preferences {
    /// Flip between the two themes.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Switch language. Returns false (and changes nothing) when the
    /// requested language equals the current one.
    pub fn set_language(&mut self, language: &str) -> bool {
        if language == self.language {
            return false;
        }
        self.language = language.to_string();
        true
    }
}

/// Reads and writes the settings file.
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_DIR)
            .join(SETTINGS_FILE)
    }

    /// Path the store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences, falling back to defaults when the file is absent
    /// or unreadable.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            return Preferences::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!("Ignoring corrupt settings {}: {err}", self.path.display());
                    Preferences::default()
                }
            },
            Err(err) => {
                warn!("Failed to read settings {}: {err}", self.path.display());
                Preferences::default()
            }
        }
    }

    /// Persist the given preferences, creating parent directories.
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised = serde_json::to_vec_pretty(prefs)?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_when_nothing_persisted() {
        let dir = tempdir().expect("tempdir");
        let store = PrefsStore::new(dir.path().join("settings.json"));
        let prefs = store.load();
        assert_eq!(prefs.language, "en");
        assert_eq!(prefs.theme, ThemeKind::Dark);
        assert_eq!(prefs.sort, "title-asc");
    }

    #[test]
    fn save_and_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = PrefsStore::new(dir.path().join("nested").join("settings.json"));

        let mut prefs = Preferences::default();
        prefs.toggle_theme();
        prefs.sort = "year-desc".to_string();
        assert!(prefs.set_language("de"));
        store.save(&prefs)?;

        let loaded = store.load();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.theme, ThemeKind::Light);
        Ok(())
    }

    #[test]
    fn theme_toggle_flips_between_exactly_two_values() {
        let mut prefs = Preferences::default();
        prefs.toggle_theme();
        assert_eq!(prefs.theme, ThemeKind::Light);
        prefs.toggle_theme();
        assert_eq!(prefs.theme, ThemeKind::Dark);
    }

    #[test]
    fn same_language_change_is_rejected() {
        let mut prefs = Preferences::default();
        assert!(!prefs.set_language("en"));
        assert!(prefs.set_language("sv"));
        assert!(!prefs.set_language("sv"));
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{broken")?;
        let store = PrefsStore::new(&path);
        assert_eq!(store.load(), Preferences::default());
        Ok(())
    }

    #[test]
    fn partial_settings_fill_in_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"theme": "light"}"#)?;
        let store = PrefsStore::new(&path);
        let prefs = store.load();
        assert_eq!(prefs.theme, ThemeKind::Light);
        assert_eq!(prefs.language, "en");
        assert_eq!(prefs.sort, "title-asc");
        Ok(())
    }
}
