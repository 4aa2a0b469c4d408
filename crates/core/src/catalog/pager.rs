//! Pagination cursor over the filtered list.
//!
//! A two-state machine: `Idle` accepts a page request, `Loading` drops any
//! further requests until the in-flight one completes. Every event source
//! (initial load, scroll threshold, filter change) routes through the same
//! guard, so rapid repeated triggers cannot materialise duplicate rows.

use std::ops::Range;

/// Share of the materialised rows that must be scrolled past before the
/// next page request fires.
pub const SCROLL_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Idle,
    Loading,
}

/// Tracks how much of the filtered list has been materialised.
#[derive(Debug)]
pub struct Pager {
    offset: usize,
    has_more: bool,
    state: PageState,
    generation: u64,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    /// A fresh cursor at offset zero.
    pub fn new() -> Self {
        Self {
            offset: 0,
            has_more: true,
            state: PageState::Idle,
            generation: 0,
        }
    }

    /// Zero the offset and optimistically assume more rows remain.
    ///
    /// Bumping the generation strands any in-flight request: its completion
    /// will no longer match and is dropped.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.has_more = true;
        self.state = PageState::Idle;
        self.generation += 1;
    }

    /// The single transition guard. Returns the generation token to hand to
    /// [`Pager::complete`] when a request may start; `None` while a request
    /// is pending or the list is exhausted.
    pub fn try_begin(&mut self) -> Option<u64> {
        if self.state == PageState::Idle && self.has_more {
            self.state = PageState::Loading;
            Some(self.generation)
        } else {
            None
        }
    }

    /// Finish a request begun with the given generation token, returning
    /// the range of the filtered list to materialise.
    ///
    /// A stale token (the cursor was reset mid-flight) yields `None` and
    /// changes nothing. An empty range clears `has_more`, as does the
    /// offset reaching `total`.
    pub fn complete(&mut self, generation: u64, total: usize, page_size: usize) -> Option<Range<usize>> {
        if generation != self.generation {
            return None;
        }
        self.state = PageState::Idle;

        let start = self.offset.min(total);
        let end = (start + page_size).min(total);
        if start == end {
            self.has_more = false;
            return Some(start..end);
        }

        self.offset = end;
        if self.offset >= total {
            self.has_more = false;
        }
        Some(start..end)
    }

    /// Current offset into the filtered list.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether unmaterialised rows remain.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == PageState::Loading
    }
}

/// Trigger policy for scroll-driven requests: fires once the cursor passes
/// [`SCROLL_THRESHOLD`] of the materialised rows.
pub fn scroll_hit_threshold(cursor: usize, materialised: usize) -> bool {
    if materialised == 0 {
        return false;
    }
    (cursor + 1) as f64 >= materialised as f64 * SCROLL_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_SIZE: usize = 9;

    #[test]
    fn pages_through_twenty_games() {
        let mut pager = Pager::new();
        pager.reset();

        let token = pager.try_begin().expect("first request");
        assert_eq!(pager.complete(token, 20, PAGE_SIZE), Some(0..9));
        assert!(pager.has_more());

        let token = pager.try_begin().expect("second request");
        assert_eq!(pager.complete(token, 20, PAGE_SIZE), Some(9..18));
        assert!(pager.has_more());

        let token = pager.try_begin().expect("third request");
        assert_eq!(pager.complete(token, 20, PAGE_SIZE), Some(18..20));
        assert!(!pager.has_more());

        assert_eq!(pager.try_begin(), None);
    }

    #[test]
    fn pending_request_drops_second_trigger() {
        let mut pager = Pager::new();
        let token = pager.try_begin().expect("first request");
        assert!(pager.is_loading());
        assert_eq!(pager.try_begin(), None);

        pager.complete(token, 20, PAGE_SIZE);
        assert!(!pager.is_loading());
        assert!(pager.try_begin().is_some());
    }

    #[test]
    fn reset_strands_in_flight_requests() {
        let mut pager = Pager::new();
        let stale = pager.try_begin().expect("request");
        pager.reset();

        assert_eq!(pager.complete(stale, 20, PAGE_SIZE), None);
        assert_eq!(pager.offset(), 0);

        let fresh = pager.try_begin().expect("request after reset");
        assert_eq!(pager.complete(fresh, 20, PAGE_SIZE), Some(0..9));
    }

    #[test]
    fn empty_list_exhausts_on_first_page() {
        let mut pager = Pager::new();
        let token = pager.try_begin().expect("request");
        assert_eq!(pager.complete(token, 0, PAGE_SIZE), Some(0..0));
        assert!(!pager.has_more());
        assert_eq!(pager.try_begin(), None);
    }

    #[test]
    fn offset_never_exceeds_total() {
        let mut pager = Pager::new();
        let token = pager.try_begin().expect("request");
        pager.complete(token, 5, PAGE_SIZE);
        assert_eq!(pager.offset(), 5);
        assert!(!pager.has_more());
    }

    #[test]
    fn scroll_threshold_fires_at_eighty_percent() {
        assert!(!scroll_hit_threshold(0, 0));
        assert!(!scroll_hit_threshold(5, 9));
        assert!(scroll_hit_threshold(7, 9));
        assert!(scroll_hit_threshold(8, 9));
        assert!(!scroll_hit_threshold(14, 20));
        assert!(scroll_hit_threshold(15, 20));
    }
}
