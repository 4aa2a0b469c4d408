//! Remote catalog mirror.
//!
//! The same documents the local data directory holds can be served from a
//! version-controlled content store; this client fetches them from the raw
//! content host and resolves relative cover paths against it.

use anyhow::{Context, Result};
use tracing::warn;

use crate::catalog::loader;
use crate::i18n::Translations;
use crate::models::Catalog;

/// Raw content host the mirror is served from.
pub const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

/// Coordinates of a mirror: a repository and branch on the content store.
#[derive(Debug, Clone)]
pub struct MirrorLocation {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch to read from.
    pub branch: String,
}

/// Client for a remote catalog mirror.
pub struct RemoteCatalog {
    client: reqwest::Client,
    location: MirrorLocation,
}

impl RemoteCatalog {
    /// Client for the given mirror coordinates.
    pub fn new(location: MirrorLocation) -> Self {
        Self {
            client: reqwest::Client::new(),
            location,
        }
    }

    /// Absolute URL for a repository-relative path.
    pub fn raw_url(&self, path: &str) -> String {
        format!(
            "{RAW_CONTENT_HOST}/{}/{}/{}/{}",
            self.location.owner,
            self.location.repo,
            self.location.branch,
            path.trim_start_matches('/')
        )
    }

    /// Resolve a relative cover path to an absolute mirror URL. Paths that
    /// are already absolute pass through untouched.
    pub fn image_url(&self, cover: &str) -> String {
        if cover.starts_with("http://") || cover.starts_with("https://") {
            cover.to_string()
        } else {
            self.raw_url(cover)
        }
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.raw_url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("mirror returned an error for {url}"))?;
        response
            .text()
            .await
            .with_context(|| format!("failed to read body of {url}"))
    }

    /// Fetch and flatten the catalog document from the mirror.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let raw = self.fetch_text("data/games.json").await?;
        let games = loader::parse_document(&raw).context("failed to parse mirrored catalog")?;
        Ok(Catalog::new(games))
    }

    /// Fetch the catalog, recovering to an empty one on any failure.
    pub async fn catalog_or_empty(&self) -> Catalog {
        match self.fetch_catalog().await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("Falling back to empty catalog: {err:#}");
                Catalog::empty()
            }
        }
    }

    /// Fetch one language's translation document from the mirror.
    pub async fn fetch_translations(&self, language: &str) -> Result<Translations> {
        let raw = self
            .fetch_text(&format!("translations/{language}.json"))
            .await?;
        let map = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {language} translations"))?;
        Ok(Translations::from_map(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror() -> RemoteCatalog {
        RemoteCatalog::new(MirrorLocation {
            owner: "homebrew-games".to_string(),
            repo: "catalog".to_string(),
            branch: "main".to_string(),
        })
    }

    #[test]
    fn raw_urls_target_the_content_host() {
        assert_eq!(
            mirror().raw_url("data/games.json"),
            "https://raw.githubusercontent.com/homebrew-games/catalog/main/data/games.json"
        );
        assert_eq!(
            mirror().raw_url("/data/games.json"),
            "https://raw.githubusercontent.com/homebrew-games/catalog/main/data/games.json"
        );
    }

    #[test]
    fn image_urls_resolve_relative_paths_only() {
        let mirror = mirror();
        assert_eq!(
            mirror.image_url("covers/sample.png"),
            "https://raw.githubusercontent.com/homebrew-games/catalog/main/covers/sample.png"
        );
        assert_eq!(
            mirror.image_url("https://example.com/cover.png"),
            "https://example.com/cover.png"
        );
    }
}
