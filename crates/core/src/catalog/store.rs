//! Catalog filtering and sorting.
//!
//! The filter/sort pipeline is a pure function over (catalog, selection,
//! sort criterion); [`CatalogStore`] wraps it with the shared state the UI
//! and background refresh tasks both touch.

use std::cmp::Ordering;
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

use crate::models::{Catalog, Game, Status, SystemId};

/// Active status filter: either the `all` sentinel or a non-empty set of
/// concrete statuses. The sentinel is never combined with members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// Show every status.
    All,
    /// Show only the listed statuses. Invariant: non-empty, no duplicates.
    Only(Vec<Status>),
}

impl StatusFilter {
    /// The sentinel filter.
    pub fn all() -> Self {
        StatusFilter::All
    }

    /// A single-status filter, as produced by explicit routes.
    pub fn only(status: Status) -> Self {
        StatusFilter::Only(vec![status])
    }

    /// True when the sentinel is active.
    pub fn is_all(&self) -> bool {
        matches!(self, StatusFilter::All)
    }

    /// Membership test used both by filtering and control highlighting.
    pub fn contains(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => false,
            StatusFilter::Only(statuses) => statuses.contains(&status),
        }
    }

    /// Whether a game with `status` passes this filter.
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(statuses) => statuses.contains(&status),
        }
    }

    /// Multi-select toggle: toggling from the sentinel selects exactly the
    /// given status; removing the last concrete status falls back to the
    /// sentinel.
    pub fn toggle(&mut self, status: Status) {
        match self {
            StatusFilter::All => *self = StatusFilter::only(status),
            StatusFilter::Only(statuses) => {
                if let Some(pos) = statuses.iter().position(|s| *s == status) {
                    statuses.remove(pos);
                    if statuses.is_empty() {
                        *self = StatusFilter::All;
                    }
                } else {
                    statuses.push(status);
                }
            }
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

/// The active system + status-filter combination driving the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Selected system; `None` is the home view.
    pub system: Option<SystemId>,
    /// Active status filter within the system.
    pub filter: StatusFilter,
}

impl Selection {
    /// The home view: nothing selected, nothing rendered.
    pub fn home() -> Self {
        Selection::default()
    }

    /// A whole-system selection (the legacy one-segment route).
    pub fn system(system: SystemId) -> Self {
        Selection {
            system: Some(system),
            filter: StatusFilter::All,
        }
    }

    /// A system narrowed to a single status (the two-segment route).
    pub fn with_status(system: SystemId, status: Status) -> Self {
        Selection {
            system: Some(system),
            filter: StatusFilter::only(status),
        }
    }
}

/// Field a sort criterion orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Order by game title.
    Title,
    /// Order by developer credit.
    Developer,
    /// Order by release year (missing year sorts as 0).
    Year,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// A parsed sort criterion such as `title-num-asc` or `year-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to order by.
    pub key: SortKey,
    /// Direction to order in.
    pub dir: SortDir,
    /// Use digit-run comparison on string fields ("Part 2" before "Part 10").
    pub numeric: bool,
}

/// Criterion strings the UI cycles through, in presentation order.
pub const SORT_CYCLE: [&str; 10] = [
    "title-asc",
    "title-desc",
    "title-num-asc",
    "title-num-desc",
    "developer-asc",
    "developer-desc",
    "developer-num-asc",
    "developer-num-desc",
    "year-asc",
    "year-desc",
];

impl SortSpec {
    /// Parse a criterion string. Unrecognised strings yield `None`, which
    /// callers treat as "no reordering" rather than an error.
    pub fn parse(raw: &str) -> Option<SortSpec> {
        let mut parts = raw.split('-');
        let key = match parts.next()? {
            "title" => SortKey::Title,
            "developer" => SortKey::Developer,
            "year" => SortKey::Year,
            _ => return None,
        };

        let mut next = parts.next()?;
        let numeric = next == "num";
        if numeric {
            if key == SortKey::Year {
                return None;
            }
            next = parts.next()?;
        }

        let dir = match next {
            "asc" => SortDir::Asc,
            "desc" => SortDir::Desc,
            _ => return None,
        };

        if parts.next().is_some() {
            return None;
        }

        Some(SortSpec { key, dir, numeric })
    }

    fn compare(&self, a: &Game, b: &Game) -> Ordering {
        let ordering = match self.key {
            SortKey::Title => text_compare(&a.title, &b.title, self.numeric),
            SortKey::Developer => text_compare(&a.developer, &b.developer, self.numeric),
            SortKey::Year => a.year.unwrap_or(0).cmp(&b.year.unwrap_or(0)),
        };
        match self.dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    }
}

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("invalid digit regex"));

fn digit_runs(text: &str) -> Vec<u64> {
    DIGIT_RUNS
        .find_iter(text)
        .filter_map(|run| run.as_str().parse().ok())
        .collect()
}

/// Case-insensitive ordering with the raw string as tiebreak.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compare digit runs element-wise at corresponding positions; when one
/// sequence is a prefix of the other, or either string carries no digits,
/// fall back to lexical ordering.
fn numeric_compare(a: &str, b: &str) -> Ordering {
    let a_runs = digit_runs(a);
    let b_runs = digit_runs(b);
    if !a_runs.is_empty() && !b_runs.is_empty() {
        for (x, y) in a_runs.iter().zip(&b_runs) {
            if x != y {
                return x.cmp(y);
            }
        }
    }
    collate(a, b)
}

fn text_compare(a: &str, b: &str, numeric: bool) -> Ordering {
    if numeric {
        numeric_compare(a, b)
    } else {
        collate(a, b)
    }
}

/// Derive the filtered+sorted subset for a selection.
///
/// Deterministic: the sort is stable, so identical inputs always produce
/// identical output ordering. An absent sort spec leaves the catalog order
/// untouched.
pub fn filter_and_sort(games: &[Game], selection: &Selection, sort: Option<SortSpec>) -> Vec<Game> {
    let Some(system) = selection.system else {
        return Vec::new();
    };

    let mut filtered: Vec<Game> = games
        .iter()
        .filter(|game| game.system == system && selection.filter.matches(game.status))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        filtered.sort_by(|a, b| spec.compare(a, b));
    }

    filtered
}

struct Inner {
    catalog: Catalog,
    selection: Selection,
    sort: Option<SortSpec>,
    filtered: Vec<Game>,
}

impl Inner {
    fn recompute(&mut self) {
        self.filtered = filter_and_sort(&self.catalog.games, &self.selection, self.sort);
    }
}

/// Thread-safe holder for the catalog, the active selection, and the
/// derived filtered list.
///
/// Recomputing the filtered list invalidates any in-progress pagination;
/// callers reset their cursor after `select`, `set_sort`, or `replace`.
pub struct CatalogStore {
    inner: Arc<RwLock<Inner>>,
}

impl Clone for CatalogStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl CatalogStore {
    /// Build a store around an initial catalog snapshot, starting at home.
    pub fn new(catalog: Catalog) -> Self {
        let mut inner = Inner {
            catalog,
            selection: Selection::home(),
            sort: None,
            filtered: Vec::new(),
        };
        inner.recompute();
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Replace the catalog wholesale (reload path) and recompute.
    pub fn replace(&self, catalog: Catalog) {
        let mut inner = self.inner.write();
        inner.catalog = catalog;
        inner.recompute();
    }

    /// Change the active selection and recompute.
    pub fn select(&self, selection: Selection) {
        let mut inner = self.inner.write();
        inner.selection = selection;
        inner.recompute();
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.inner.read().selection.clone()
    }

    /// Apply a raw criterion string; unrecognised values disable sorting.
    pub fn set_sort(&self, raw: &str) {
        let mut inner = self.inner.write();
        inner.sort = SortSpec::parse(raw);
        inner.recompute();
    }

    /// Length of the filtered list.
    pub fn filtered_len(&self) -> usize {
        self.inner.read().filtered.len()
    }

    /// Clone of the whole filtered list.
    pub fn filtered(&self) -> Vec<Game> {
        self.inner.read().filtered.clone()
    }

    /// Clone of a contiguous range of the filtered list, clamped to its
    /// length; used by page completion.
    pub fn page(&self, range: Range<usize>) -> Vec<Game> {
        let inner = self.inner.read();
        let start = range.start.min(inner.filtered.len());
        let end = range.end.min(inner.filtered.len());
        inner.filtered[start..end].to_vec()
    }

    /// Total number of games in the current catalog snapshot.
    pub fn total_len(&self) -> usize {
        self.inner.read().catalog.len()
    }

    /// Per-system game counts for the home view, in presentation order.
    pub fn counts_by_system(&self) -> Vec<(SystemId, usize)> {
        let inner = self.inner.read();
        SystemId::ALL
            .into_iter()
            .map(|system| {
                let count = inner
                    .catalog
                    .games
                    .iter()
                    .filter(|game| game.system == system)
                    .count();
                (system, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(title: &str, developer: &str, year: Option<i32>, system: SystemId, status: Status) -> Game {
        Game {
            title: title.to_string(),
            developer: developer.to_string(),
            year,
            cover: format!("covers/{title}.png"),
            system,
            status,
            download_url: None,
            buy_url: None,
        }
    }

    fn sample_games() -> Vec<Game> {
        vec![
            game("Part 2", "Beta Works", Some(2020), SystemId::Nes, Status::Ports),
            game("Part 10", "Alpha Team", Some(2018), SystemId::Nes, Status::NewGames),
            game("Part 1", "Gamma Soft", None, SystemId::Nes, Status::Ports),
            game("Other", "Delta", Some(2021), SystemId::SegaSaturn, Status::NewGames),
        ]
    }

    fn titles(games: &[Game]) -> Vec<&str> {
        games.iter().map(|game| game.title.as_str()).collect()
    }

    #[test]
    fn all_filter_matches_system_regardless_of_status() {
        let games = sample_games();
        let filtered = filter_and_sort(&games, &Selection::system(SystemId::Nes), None);
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|game| game.system == SystemId::Nes));
    }

    #[test]
    fn concrete_filter_matches_system_and_status() {
        let games = sample_games();
        let selection = Selection::with_status(SystemId::Nes, Status::Ports);
        let filtered = filter_and_sort(&games, &selection, None);
        assert_eq!(titles(&filtered), vec!["Part 2", "Part 1"]);
    }

    #[test]
    fn multi_select_filter_unions_statuses() {
        let games = sample_games();
        let mut selection = Selection::with_status(SystemId::Nes, Status::Ports);
        selection.filter.toggle(Status::NewGames);
        let filtered = filter_and_sort(&games, &selection, None);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn home_selection_yields_nothing() {
        let games = sample_games();
        assert!(filter_and_sort(&games, &Selection::home(), None).is_empty());
    }

    #[test]
    fn numeric_sort_orders_digit_runs() {
        let games = sample_games();
        let selection = Selection::system(SystemId::Nes);
        let sorted = filter_and_sort(&games, &selection, SortSpec::parse("title-num-asc"));
        assert_eq!(titles(&sorted), vec!["Part 1", "Part 2", "Part 10"]);
    }

    #[test]
    fn lexical_sort_orders_digit_runs_as_text() {
        let games = sample_games();
        let selection = Selection::system(SystemId::Nes);
        let sorted = filter_and_sort(&games, &selection, SortSpec::parse("title-asc"));
        assert_eq!(titles(&sorted), vec!["Part 1", "Part 10", "Part 2"]);
    }

    #[test]
    fn numeric_sort_descending_reverses() {
        let games = sample_games();
        let selection = Selection::system(SystemId::Nes);
        let sorted = filter_and_sort(&games, &selection, SortSpec::parse("title-num-desc"));
        assert_eq!(titles(&sorted), vec!["Part 10", "Part 2", "Part 1"]);
    }

    #[test]
    fn digit_free_titles_fall_back_to_lexical() {
        assert_eq!(numeric_compare("Alpha", "beta"), Ordering::Less);
        assert_eq!(numeric_compare("Part 2", "Part 2"), Ordering::Equal);
    }

    #[test]
    fn missing_year_sorts_as_zero() {
        let games = sample_games();
        let selection = Selection::system(SystemId::Nes);
        let sorted = filter_and_sort(&games, &selection, SortSpec::parse("year-asc"));
        assert_eq!(titles(&sorted), vec!["Part 1", "Part 10", "Part 2"]);
    }

    #[test]
    fn unknown_sort_is_a_stable_no_op() {
        let games = sample_games();
        let selection = Selection::system(SystemId::Nes);
        assert_eq!(SortSpec::parse("rating-asc"), None);
        assert_eq!(SortSpec::parse("title"), None);
        assert_eq!(SortSpec::parse("year-num-asc"), None);
        assert_eq!(SortSpec::parse("title-asc-extra"), None);
        let unsorted = filter_and_sort(&games, &selection, SortSpec::parse("rating-asc"));
        assert_eq!(titles(&unsorted), vec!["Part 2", "Part 10", "Part 1"]);
    }

    #[test]
    fn sort_cycle_entries_all_parse() {
        for raw in SORT_CYCLE {
            assert!(SortSpec::parse(raw).is_some(), "{raw} should parse");
        }
    }

    #[test]
    fn filter_and_sort_is_deterministic() {
        let games = sample_games();
        let selection = Selection::system(SystemId::Nes);
        let spec = SortSpec::parse("developer-asc");
        let first = filter_and_sort(&games, &selection, spec);
        let second = filter_and_sort(&games, &selection, spec);
        assert_eq!(first, second);
    }

    #[test]
    fn status_filter_toggle_follows_multi_select_rules() {
        let mut filter = StatusFilter::All;
        filter.toggle(Status::Ports);
        assert_eq!(filter, StatusFilter::only(Status::Ports));

        filter.toggle(Status::NewGames);
        assert!(filter.contains(Status::Ports));
        assert!(filter.contains(Status::NewGames));

        filter.toggle(Status::Ports);
        filter.toggle(Status::NewGames);
        assert!(filter.is_all());
    }

    #[test]
    fn store_recomputes_on_selection_and_replace() {
        let store = CatalogStore::new(Catalog::new(sample_games()));
        assert_eq!(store.filtered_len(), 0);

        store.select(Selection::system(SystemId::Nes));
        assert_eq!(store.filtered_len(), 3);

        store.replace(Catalog::empty());
        assert_eq!(store.filtered_len(), 0);
        assert_eq!(store.total_len(), 0);
    }

    #[test]
    fn store_page_clamps_to_filtered_length() {
        let store = CatalogStore::new(Catalog::new(sample_games()));
        store.select(Selection::system(SystemId::Nes));
        store.set_sort("title-num-asc");
        assert_eq!(titles(&store.page(1..10)), vec!["Part 2", "Part 10"]);
        assert!(store.page(5..9).is_empty());
    }

    #[test]
    fn counts_by_system_cover_all_systems() {
        let store = CatalogStore::new(Catalog::new(sample_games()));
        let counts = store.counts_by_system();
        assert_eq!(counts.len(), SystemId::ALL.len());
        let nes = counts
            .iter()
            .find(|(system, _)| *system == SystemId::Nes)
            .expect("nes counted");
        assert_eq!(nes.1, 3);
    }
}
