//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::remote::MirrorLocation;

/// Directory under the user's config dir holding the config file.
pub const CONFIG_DIR: &str = "brewdex";
/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";
/// Page size used when the config does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 9;

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# brewdex configuration.
#
# data_source selects where the catalog document comes from:
#   "local"  - read <data_dir>/games.json from disk (watched for changes)
#   "remote" - fetch it from the configured mirror
#data_source = "local"

# Directory holding games.json.
#data_dir = "data"

# Directory holding per-language translation documents (<lang>.json).
#translations_dir = "translations"

# Mirror coordinates, used when data_source = "remote".
#mirror_owner = "homebrew-games"
#mirror_repo = "catalog"
#mirror_branch = "main"

# Games materialised per page.
#page_size = 9
"#;

/// Where the catalog document is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Local data directory (default).
    #[default]
    Local,
    /// Remote mirror.
    Remote,
}

/// Application configuration, merged from defaults, the config file, and
/// `BREWDEX_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding the catalog document.
    pub data_dir: PathBuf,
    /// Directory holding translation documents.
    pub translations_dir: PathBuf,
    /// Catalog source selection.
    pub data_source: DataSource,
    /// Mirror repository owner.
    pub mirror_owner: String,
    /// Mirror repository name.
    pub mirror_repo: String,
    /// Mirror branch.
    pub mirror_branch: String,
    /// Games materialised per page.
    pub page_size: usize,
}

impl AppConfig {
    /// Load configuration from the default file location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path())
    }

    /// Load configuration, layering the given file over built-in defaults
    /// and under environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("data_dir", "data")?
            .set_default("translations_dir", "translations")?
            .set_default("data_source", "local")?
            .set_default("mirror_owner", "homebrew-games")?
            .set_default("mirror_repo", "catalog")?
            .set_default("mirror_branch", "main")?
            .set_default("page_size", DEFAULT_PAGE_SIZE as i64)?
            .add_source(config::File::from(path.as_ref().to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix("BREWDEX"))
            .build()
            .context("failed to assemble configuration")?;

        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }

    /// Path to the catalog document.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join("games.json")
    }

    /// Mirror coordinates for the remote data source.
    pub fn mirror(&self) -> MirrorLocation {
        MirrorLocation {
            owner: self.mirror_owner.clone(),
            repo: self.mirror_repo.clone(),
            branch: self.mirror_branch.clone(),
        }
    }
}

/// Directory holding brewdex configuration.
pub fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

/// Full path of the config file.
pub fn config_file_path() -> PathBuf {
    config_root().join(CONFIG_FILE)
}

/// Write a commented default config on first run; leaves an existing file
/// untouched.
pub fn ensure_default_config() -> Result<()> {
    write_default(&config_file_path())
}

fn write_default(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_a_config_file() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("missing.toml"))?;
        assert_eq!(config.data_source, DataSource::Local);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.data_file(), PathBuf::from("data/games.json"));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_source = \"remote\"\npage_size = 12\nmirror_branch = \"next\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_source, DataSource::Remote);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.mirror().branch, "next");
        Ok(())
    }

    #[test]
    fn write_default_respects_existing_files() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");

        write_default(&path)?;
        assert!(path.exists());
        let template = fs::read_to_string(&path)?;
        assert!(template.contains("data_source"));

        fs::write(&path, "page_size = 3\n")?;
        write_default(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "page_size = 3\n");
        Ok(())
    }
}
