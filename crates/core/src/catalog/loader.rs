//! Catalog document loading and flattening.
//!
//! The catalog ships as a single JSON document keyed by system id, each
//! value keyed by the four status categories, each holding a list of game
//! objects. Loading flattens that into one list, tagging every entry with
//! the system and status key it was found under.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::models::{fallback_label, Catalog, Game, Status, SystemId};

/// Failure classes for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document could not be read from disk.
    #[error("failed to read catalog document {path}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The document was not valid JSON of the expected shape.
    #[error("failed to parse catalog document")]
    Parse(#[from] serde_json::Error),
}

/// One game object as it appears in the document, before system/status
/// tagging.
#[derive(Debug, Deserialize)]
struct GameEntry {
    title: String,
    developer: String,
    #[serde(default)]
    year: Option<i32>,
    cover: String,
    #[serde(default, rename = "downloadUrl")]
    download_url: Option<String>,
    #[serde(default, rename = "buyUrl")]
    buy_url: Option<String>,
}

impl GameEntry {
    fn into_game(self, system: SystemId, status: Status) -> Game {
        Game {
            title: self.title,
            developer: self.developer,
            year: self.year,
            cover: self.cover,
            system,
            status,
            download_url: self.download_url,
            buy_url: self.buy_url,
        }
    }
}

/// Flatten a raw catalog document into a game list.
///
/// Unknown system keys are skipped with a warning; only the four known
/// status keys are read, so unknown status keys are ignored outright.
pub fn parse_document(raw: &str) -> Result<Vec<Game>, CatalogError> {
    let document: serde_json::Map<String, Value> = serde_json::from_str(raw)?;

    let mut games = Vec::new();
    for (system_key, categories) in &document {
        let Some(system) = SystemId::parse(system_key) else {
            warn!(
                "Skipping unknown system {} ({})",
                system_key,
                fallback_label(system_key)
            );
            continue;
        };

        for status in Status::ALL {
            let Some(entries) = categories.get(status.as_str()) else {
                continue;
            };
            let entries: Vec<GameEntry> = serde_json::from_value(entries.clone())?;
            games.extend(entries.into_iter().map(|entry| entry.into_game(system, status)));
        }
    }

    Ok(games)
}

/// Load and flatten the catalog document at `path`.
pub fn load_file(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let games = parse_document(&raw)?;
    info!(total = games.len(), path = %path.display(), "Catalog loaded");
    Ok(Catalog::new(games))
}

/// Load the catalog, recovering to an empty one on any failure.
///
/// Fetch failures are never fatal: the worst outcome is an empty view.
pub fn load_or_empty(path: impl AsRef<Path>) -> Catalog {
    let path = path.as_ref();
    match load_file(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!("Falling back to empty catalog: {err:#}");
            Catalog::empty()
        }
    }
}
