//! Route parsing and navigation history.
//!
//! Routes keep the fragment grammar of the original catalog: `""` (or the
//! bare `#`) is home, `#<system>` is the legacy whole-system form, and
//! `#<system>/<status>` narrows to a single status. Anything else is
//! malformed and produces no transition.

use crate::catalog::Selection;
use crate::models::{Status, SystemId};

/// A resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The home view.
    Home,
    /// A system view, optionally narrowed to one status.
    System {
        /// Selected system.
        system: SystemId,
        /// Explicit status from a two-segment route; `None` means all.
        status: Option<Status>,
    },
}

impl Route {
    /// Parse a raw route string; `None` for malformed routes (wrong segment
    /// count, empty segments, unknown system or status keys).
    pub fn parse(raw: &str) -> Option<Route> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "#" {
            return Some(Route::Home);
        }

        let rest = raw.strip_prefix('#')?;
        let mut segments = rest.split('/');
        let system_key = segments.next()?;
        if system_key.is_empty() {
            return None;
        }
        let system = SystemId::parse(system_key)?;

        match (segments.next(), segments.next()) {
            (None, _) => Some(Route::System {
                system,
                status: None,
            }),
            (Some(status_key), None) if !status_key.is_empty() => {
                let status = Status::parse(status_key)?;
                Some(Route::System {
                    system,
                    status: Some(status),
                })
            }
            _ => None,
        }
    }

    /// The canonical string form of this route.
    pub fn as_string(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::System {
                system,
                status: None,
            } => format!("#{}", system.as_str()),
            Route::System {
                system,
                status: Some(status),
            } => format!("#{}/{}", system.as_str(), status.as_str()),
        }
    }

    /// The selection this route drives the catalog store to.
    pub fn selection(&self) -> Selection {
        match self {
            Route::Home => Selection::home(),
            Route::System {
                system,
                status: None,
            } => Selection::system(*system),
            Route::System {
                system,
                status: Some(status),
            } => Selection::with_status(*system, *status),
        }
    }
}

/// Linear navigation history over route strings.
///
/// Pushing the current route again is a no-op so traversal never yields
/// duplicate entries; pushing from the middle truncates the forward tail.
#[derive(Debug)]
pub struct RouteHistory {
    entries: Vec<String>,
    index: usize,
}

impl RouteHistory {
    /// History seeded with an initial route.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// The route currently navigated to.
    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Record a navigation. Returns false (and records nothing) when the
    /// route equals the current entry.
    pub fn push(&mut self, route: &str) -> bool {
        if route == self.current() {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(route.to_string());
        self.index = self.entries.len() - 1;
        true
    }

    /// Step backwards, returning the route to resolve.
    pub fn back(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forwards, returning the route to resolve.
    pub fn forward(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StatusFilter;

    #[test]
    fn explicit_route_resolves_system_and_status() {
        let route = Route::parse("#nes/ports").expect("valid route");
        assert_eq!(
            route,
            Route::System {
                system: SystemId::Nes,
                status: Some(Status::Ports),
            }
        );
        let selection = route.selection();
        assert_eq!(selection.system, Some(SystemId::Nes));
        assert_eq!(selection.filter, StatusFilter::only(Status::Ports));
    }

    #[test]
    fn legacy_route_implies_all_statuses() {
        let route = Route::parse("#nes").expect("valid route");
        let selection = route.selection();
        assert_eq!(selection.system, Some(SystemId::Nes));
        assert!(selection.filter.is_all());
    }

    #[test]
    fn empty_and_bare_marker_are_home() {
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("#"), Some(Route::Home));
        assert_eq!(Route::parse("").map(|r| r.selection().system), Some(None));
    }

    #[test]
    fn malformed_routes_are_rejected() {
        assert_eq!(Route::parse("#nes/ports/extra"), None);
        assert_eq!(Route::parse("#nes/"), None);
        assert_eq!(Route::parse("#/ports"), None);
        assert_eq!(Route::parse("nes"), None);
        assert_eq!(Route::parse("#amiga"), None);
        assert_eq!(Route::parse("#nes/demos"), None);
    }

    #[test]
    fn route_strings_round_trip() {
        for raw in ["", "#nes", "#nes/ports", "#sega-mega-drive/re-releases"] {
            let route = Route::parse(raw).expect("valid route");
            assert_eq!(route.as_string(), raw);
        }
    }

    #[test]
    fn history_push_dedupes_current_entry() {
        let mut history = RouteHistory::default();
        assert!(history.push("#nes"));
        assert!(!history.push("#nes"));
        assert_eq!(history.current(), "#nes");
    }

    #[test]
    fn history_back_and_forward_traverse() {
        let mut history = RouteHistory::default();
        history.push("#nes");
        history.push("#nes/ports");

        assert_eq!(history.back(), Some("#nes"));
        assert_eq!(history.back(), Some(""));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some("#nes"));
        assert_eq!(history.forward(), Some("#nes/ports"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn history_push_truncates_forward_tail() {
        let mut history = RouteHistory::default();
        history.push("#nes");
        history.push("#nes/ports");
        history.back();

        assert!(history.push("#sega-saturn"));
        assert_eq!(history.forward(), None);
        assert_eq!(history.back(), Some("#nes"));
    }
}
