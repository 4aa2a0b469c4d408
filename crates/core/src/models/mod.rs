//! Shared domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Retro platforms the catalog is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemId {
    /// Sega Mega Drive / Genesis.
    SegaMegaDrive,
    /// Super Nintendo Entertainment System.
    SuperNintendo,
    /// Sega Master System.
    MasterSystem,
    /// Nintendo Entertainment System.
    Nes,
    /// Sony PlayStation.
    #[serde(rename = "playstation-1")]
    Playstation1,
    /// Nintendo 64.
    #[serde(rename = "nintendo-64")]
    Nintendo64,
    /// Sega Saturn.
    SegaSaturn,
    /// Sega Dreamcast.
    SegaDreamcast,
}

impl SystemId {
    /// Every known system, in presentation order.
    pub const ALL: [SystemId; 8] = [
        SystemId::SegaMegaDrive,
        SystemId::SuperNintendo,
        SystemId::MasterSystem,
        SystemId::Nes,
        SystemId::Playstation1,
        SystemId::Nintendo64,
        SystemId::SegaSaturn,
        SystemId::SegaDreamcast,
    ];

    /// Canonical key used in catalog documents and routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemId::SegaMegaDrive => "sega-mega-drive",
            SystemId::SuperNintendo => "super-nintendo",
            SystemId::MasterSystem => "master-system",
            SystemId::Nes => "nes",
            SystemId::Playstation1 => "playstation-1",
            SystemId::Nintendo64 => "nintendo-64",
            SystemId::SegaSaturn => "sega-saturn",
            SystemId::SegaDreamcast => "sega-dreamcast",
        }
    }

    /// Parse a raw key back into a system identifier.
    pub fn parse(raw: &str) -> Option<SystemId> {
        SystemId::ALL
            .into_iter()
            .find(|system| system.as_str() == raw)
    }

    /// User-facing name for the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            SystemId::SegaMegaDrive => "Sega Mega Drive",
            SystemId::SuperNintendo => "Super Nintendo",
            SystemId::MasterSystem => "Master System",
            SystemId::Nes => "NES",
            SystemId::Playstation1 => "PlayStation 1",
            SystemId::Nintendo64 => "Nintendo 64",
            SystemId::SegaSaturn => "Sega Saturn",
            SystemId::SegaDreamcast => "Sega Dreamcast",
        }
    }
}

/// Release-state classification of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Original releases.
    NewGames,
    /// Ports from other platforms.
    Ports,
    /// Re-releases of period titles.
    ReReleases,
    /// Still in development.
    InDevelopment,
}

impl Status {
    /// Every status category, in the order catalog documents use.
    pub const ALL: [Status; 4] = [
        Status::NewGames,
        Status::Ports,
        Status::ReReleases,
        Status::InDevelopment,
    ];

    /// Canonical key used in catalog documents and routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NewGames => "new-games",
            Status::Ports => "ports",
            Status::ReReleases => "re-releases",
            Status::InDevelopment => "in-development",
        }
    }

    /// Parse a raw key back into a status category.
    pub fn parse(raw: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|status| status.as_str() == raw)
    }

    /// User-facing label for the status tag on a card.
    pub fn display_name(&self) -> &'static str {
        match self {
            Status::NewGames => "New Game",
            Status::Ports => "Port",
            Status::ReReleases => "Re-Release",
            Status::InDevelopment => "In Development",
        }
    }

    /// Translation key for the matching filter control.
    pub fn filter_key(&self) -> &'static str {
        match self {
            Status::NewGames => "filter-new-games",
            Status::Ports => "filter-ports",
            Status::ReReleases => "filter-re-releases",
            Status::InDevelopment => "filter-in-development",
        }
    }
}

/// Display fallback for keys outside the known enums: capitalise the raw key.
pub fn fallback_label(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// How a game can be obtained, derived from its monetisation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// A download link exists.
    Free,
    /// Only a purchase link exists.
    Paid,
    /// Neither link exists.
    Unavailable,
}

/// A single catalog entry. Immutable after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Game title.
    pub title: String,
    /// Developer or team credit.
    pub developer: String,
    /// Release year, when known.
    #[serde(default)]
    pub year: Option<i32>,
    /// Relative path to the cover image.
    pub cover: String,
    /// Platform the game targets.
    pub system: SystemId,
    /// Release-state category.
    pub status: Status,
    /// Link for a free download, if offered.
    #[serde(default, rename = "downloadUrl", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Link to a storefront, if sold.
    #[serde(default, rename = "buyUrl", skip_serializing_if = "Option::is_none")]
    pub buy_url: Option<String>,
}

impl Game {
    /// Monetisation summary; a download link wins when both are present.
    pub fn availability(&self) -> Availability {
        if self.download_url.is_some() {
            Availability::Free
        } else if self.buy_url.is_some() {
            Availability::Paid
        } else {
            Availability::Unavailable
        }
    }
}

/// A full catalog snapshot, replaced wholesale on reload.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Flattened game list.
    pub games: Vec<Game>,
    /// When this snapshot was produced.
    pub fetched_at: DateTime<Utc>,
}

impl Catalog {
    /// Wrap a flattened game list with a fresh timestamp.
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games,
            fetched_at: Utc::now(),
        }
    }

    /// A catalog with no entries, used when loading fails.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of games in the snapshot.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// True when the snapshot holds no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_keys_round_trip() {
        for system in SystemId::ALL {
            assert_eq!(SystemId::parse(system.as_str()), Some(system));
        }
        assert_eq!(SystemId::parse("game-boy"), None);
    }

    #[test]
    fn status_keys_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("homebrew"), None);
    }

    #[test]
    fn serde_keys_match_canonical_keys() {
        for system in SystemId::ALL {
            let encoded = serde_json::to_value(system).expect("system serialises");
            assert_eq!(encoded, serde_json::Value::String(system.as_str().into()));
        }
        for status in Status::ALL {
            let encoded = serde_json::to_value(status).expect("status serialises");
            assert_eq!(encoded, serde_json::Value::String(status.as_str().into()));
        }
    }

    #[test]
    fn fallback_label_capitalises_raw_keys() {
        assert_eq!(fallback_label("gamegear"), "Gamegear");
        assert_eq!(fallback_label(""), "");
    }

    #[test]
    fn download_link_wins_over_buy_link() {
        let mut game = Game {
            title: "Sample".to_string(),
            developer: "Dev".to_string(),
            year: Some(2023),
            cover: "covers/sample.png".to_string(),
            system: SystemId::Nes,
            status: Status::Ports,
            download_url: Some("https://example.com/dl".to_string()),
            buy_url: Some("https://example.com/buy".to_string()),
        };
        assert_eq!(game.availability(), Availability::Free);

        game.download_url = None;
        assert_eq!(game.availability(), Availability::Paid);

        game.buy_url = None;
        assert_eq!(game.availability(), Availability::Unavailable);
    }
}
