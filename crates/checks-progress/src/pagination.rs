//! Full-list pagination
//!
//! Page size is derived from the display capacity at runtime, never fixed.
//! The state machine only ever sees the resulting `max_page`.

use crate::state_machine::ProgressState;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Fixed layout measurements, in display units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Height of one list item
    pub item_height: u32,
    /// Lower bound on items per page
    pub min_items_per_page: usize,
    /// Space taken by the title bar, header and padding
    pub chrome_height: u32,
    /// Space taken by the navigation button bar when shown
    pub button_bar_height: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            item_height: 80,
            min_items_per_page: 5,
            chrome_height: 56 + 32 + 24 + 16,
            button_bar_height: 80,
        }
    }
}

impl PaginationConfig {
    /// Set item height
    #[must_use]
    pub const fn with_item_height(mut self, height: u32) -> Self {
        self.item_height = height;
        self
    }

    /// Set minimum items per page
    #[must_use]
    pub const fn with_min_items_per_page(mut self, min: usize) -> Self {
        self.min_items_per_page = min;
        self
    }
}

/// Resolved page size for one screen configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    items_per_page: usize,
}

impl PageLayout {
    /// Layout with a fixed page size (at least 1)
    #[must_use]
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
        }
    }

    /// Items that fit in `available_height`, floored, never below the configured minimum
    #[must_use]
    pub fn from_capacity(available_height: u32, config: &PaginationConfig) -> Self {
        let fitting = if config.item_height == 0 {
            0
        } else {
            (available_height / config.item_height) as usize
        };
        Self::new(fitting.max(config.min_items_per_page))
    }

    /// Layout for a whole screen, subtracting chrome and the optional button bar
    #[must_use]
    pub fn for_screen(screen_height: u32, show_buttons: bool, config: &PaginationConfig) -> Self {
        let mut reserved = config.chrome_height;
        if show_buttons {
            reserved = reserved.saturating_add(config.button_bar_height);
        }
        Self::from_capacity(screen_height.saturating_sub(reserved), config)
    }

    /// Items shown on a full page
    #[inline]
    #[must_use]
    pub const fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Number of pages; an empty list still has one page
    #[must_use]
    pub const fn page_count(&self, item_count: usize) -> usize {
        if item_count == 0 {
            1
        } else {
            (item_count - 1) / self.items_per_page + 1
        }
    }

    /// Last valid page index
    #[must_use]
    pub const fn max_page(&self, item_count: usize) -> usize {
        self.page_count(item_count) - 1
    }

    /// Item positions shown on `page`
    #[must_use]
    pub fn page_range(&self, page: usize, item_count: usize) -> Range<usize> {
        let start = page.saturating_mul(self.items_per_page).min(item_count);
        let end = start.saturating_add(self.items_per_page).min(item_count);
        start..end
    }

    /// Page containing `position`
    #[must_use]
    pub const fn page_of(&self, position: usize) -> usize {
        position / self.items_per_page
    }
}

/// What the page machine does once the current page is fully checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAdvance {
    /// Move to the next page
    NextPage,
    /// Last page done; the checklist is complete
    Complete,
}

/// Auto-advance decision for the current page, if any
#[must_use]
pub fn evaluate_auto_advance(
    state: &ProgressState,
    layout: &PageLayout,
    item_count: usize,
) -> Option<AutoAdvance> {
    let page = state.page_index();
    if !state.all_checked(layout.page_range(page, item_count)) {
        return None;
    }
    if page >= layout.max_page(item_count) {
        Some(AutoAdvance::Complete)
    } else {
        Some(AutoAdvance::NextPage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_floored() {
        let config = PaginationConfig::default();
        assert_eq!(PageLayout::from_capacity(799, &config).items_per_page(), 9);
        assert_eq!(PageLayout::from_capacity(800, &config).items_per_page(), 10);
    }

    #[test]
    fn minimum_of_five_items() {
        let config = PaginationConfig::default();
        assert_eq!(PageLayout::from_capacity(100, &config).items_per_page(), 5);
        assert_eq!(PageLayout::for_screen(0, true, &config).items_per_page(), 5);
    }

    #[test]
    fn screen_subtracts_chrome_and_buttons() {
        let config = PaginationConfig::default();
        // 1000 - 128 = 872 -> 10 items; minus 80 more -> 792 -> 9 items
        assert_eq!(PageLayout::for_screen(1000, false, &config).items_per_page(), 10);
        assert_eq!(PageLayout::for_screen(1000, true, &config).items_per_page(), 9);
    }

    #[test]
    fn page_counts() {
        let layout = PageLayout::new(5);
        assert_eq!(layout.page_count(0), 1);
        assert_eq!(layout.page_count(5), 1);
        assert_eq!(layout.page_count(6), 2);
        assert_eq!(layout.max_page(12), 2);
    }

    #[test]
    fn last_page_is_partial() {
        let layout = PageLayout::new(5);
        assert_eq!(layout.page_range(0, 12), 0..5);
        assert_eq!(layout.page_range(2, 12), 10..12);
        assert_eq!(layout.page_range(7, 12), 12..12);
        assert_eq!(layout.page_of(11), 2);
    }

    #[test]
    fn auto_advance_decision() {
        let layout = PageLayout::new(5);
        let mut state = ProgressState::new();
        assert_eq!(evaluate_auto_advance(&state, &layout, 7), None);

        state.set_checked((0..5).collect());
        assert_eq!(evaluate_auto_advance(&state, &layout, 7), Some(AutoAdvance::NextPage));

        let _ = state.next_page(layout.max_page(7));
        assert_eq!(evaluate_auto_advance(&state, &layout, 7), None);
        state.toggle_checked(5);
        state.toggle_checked(6);
        assert_eq!(evaluate_auto_advance(&state, &layout, 7), Some(AutoAdvance::Complete));
    }

    #[test]
    fn empty_list_never_auto_advances() {
        let state = ProgressState::new();
        assert_eq!(evaluate_auto_advance(&state, &PageLayout::new(5), 0), None);
    }
}
