#![warn(clippy::all, missing_docs)]

//! Core domain logic for the brewdex catalog browser.
//!
//! This crate hosts the data models, catalog loading and filtering,
//! pagination, routing, preference persistence, and translation handling
//! used by the terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod i18n;
pub mod models;
pub mod prefs;
pub mod remote;
pub mod route;

pub use catalog::{
    filter_and_sort, scroll_hit_threshold, CatalogStore, CatalogSync, Pager, Selection, SortSpec,
    StatusFilter, SyncEvent,
};
pub use config::AppConfig;
pub use i18n::{TranslationDir, Translations};
pub use models::{Availability, Catalog, Game, Status, SystemId};
pub use prefs::{Preferences, PrefsStore, ThemeKind};
pub use route::{Route, RouteHistory};
