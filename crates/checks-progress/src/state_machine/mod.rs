//! Per-checklist progress state machine
//!
//! Every operation is total. Requests past a bound leave the state untouched
//! and report [`Transition::AtBound`]; the caller decides whether that means
//! leaving the checklist.

use crate::mode::ModePreference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// Persistence contract: one record per checklist id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Current step (step-by-step mode)
    pub step_index: usize,
    /// Current page (full-list mode)
    pub page_index: usize,
    /// Checked step positions (full-list mode)
    pub checked: BTreeSet<usize>,
    /// Display mode preference
    pub mode_preference: ModePreference,
    /// Voice navigation enabled
    pub voice_control: bool,
}

/// Outcome of a navigation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// Index moved by one
    Moved {
        /// Previous index
        from: usize,
        /// New index
        to: usize,
    },
    /// Index was out of range and was pulled back inside it
    Clamped {
        /// Previous index
        from: usize,
        /// New index
        to: usize,
    },
    /// Already at the bound; nothing changed
    AtBound,
}

impl Transition {
    /// Whether the state changed
    #[inline]
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::AtBound)
    }

    /// Index after the transition, if it changed
    #[must_use]
    pub const fn target(self) -> Option<usize> {
        match self {
            Self::Moved { to, .. } | Self::Clamped { to, .. } => Some(to),
            Self::AtBound => None,
        }
    }
}

/// Navigation and check state for one checklist
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    step_index: usize,
    page_index: usize,
    checked: BTreeSet<usize>,
    mode_preference: ModePreference,
    voice_control: bool,
}

impl ProgressState {
    /// Fresh state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a persisted record
    #[must_use]
    pub fn from_record(record: ProgressRecord) -> Self {
        Self {
            step_index: record.step_index,
            page_index: record.page_index,
            checked: record.checked,
            mode_preference: record.mode_preference,
            voice_control: record.voice_control,
        }
    }

    /// Snapshot for persistence
    #[must_use]
    pub fn to_record(&self) -> ProgressRecord {
        ProgressRecord {
            step_index: self.step_index,
            page_index: self.page_index,
            checked: self.checked.clone(),
            mode_preference: self.mode_preference,
            voice_control: self.voice_control,
        }
    }

    /// Current step index
    #[inline]
    #[must_use]
    pub const fn step_index(&self) -> usize {
        self.step_index
    }

    /// Current page index
    #[inline]
    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// Checked positions
    #[inline]
    #[must_use]
    pub const fn checked(&self) -> &BTreeSet<usize> {
        &self.checked
    }

    /// Whether `position` is checked
    #[inline]
    #[must_use]
    pub fn is_checked(&self, position: usize) -> bool {
        self.checked.contains(&position)
    }

    /// Display mode preference
    #[inline]
    #[must_use]
    pub const fn mode_preference(&self) -> ModePreference {
        self.mode_preference
    }

    /// Whether voice navigation is enabled
    #[inline]
    #[must_use]
    pub const fn voice_control(&self) -> bool {
        self.voice_control
    }

    /// Advance one step, bounded by `max_index`
    pub fn next_step(&mut self, max_index: usize) -> Transition {
        advance(&mut self.step_index, max_index)
    }

    /// Go back one step, bounded by 0
    pub fn prev_step(&mut self) -> Transition {
        retreat(&mut self.step_index)
    }

    /// Advance one page, bounded by `max_page`
    pub fn next_page(&mut self, max_page: usize) -> Transition {
        advance(&mut self.page_index, max_page)
    }

    /// Go back one page, bounded by 0
    pub fn prev_page(&mut self) -> Transition {
        retreat(&mut self.page_index)
    }

    /// Jump to a step; out-of-range targets clamp to `max_index`
    pub fn set_step(&mut self, index: usize, max_index: usize) -> Transition {
        jump(&mut self.step_index, index, max_index)
    }

    /// Jump to a page; out-of-range targets clamp to `max_page`
    pub fn set_page(&mut self, page: usize, max_page: usize) -> Transition {
        jump(&mut self.page_index, page, max_page)
    }

    /// Pull the step index back inside `[0, max_index]`
    pub fn clamp_step(&mut self, max_index: usize) -> Transition {
        clamp(&mut self.step_index, max_index)
    }

    /// Pull the page index back inside `[0, max_page]`
    pub fn clamp_page(&mut self, max_page: usize) -> Transition {
        clamp(&mut self.page_index, max_page)
    }

    /// Replace the checked set outright
    pub fn set_checked(&mut self, checked: BTreeSet<usize>) {
        self.checked = checked;
    }

    /// Flip one position; returns whether it is now checked
    pub fn toggle_checked(&mut self, position: usize) -> bool {
        if self.checked.remove(&position) {
            false
        } else {
            self.checked.insert(position);
            true
        }
    }

    /// Whether every position in `range` is checked (false for an empty range)
    #[must_use]
    pub fn all_checked(&self, range: Range<usize>) -> bool {
        !range.is_empty() && range.into_iter().all(|position| self.checked.contains(&position))
    }

    /// Set the display mode preference
    pub fn set_mode_preference(&mut self, preference: ModePreference) {
        self.mode_preference = preference;
    }

    /// Enable or disable voice navigation
    pub fn set_voice_control(&mut self, enabled: bool) {
        self.voice_control = enabled;
    }

    /// Clear progress; mode preference and voice control are kept
    pub fn reset(&mut self) {
        self.step_index = 0;
        self.page_index = 0;
        self.checked.clear();
    }
}

impl From<ProgressRecord> for ProgressState {
    fn from(record: ProgressRecord) -> Self {
        Self::from_record(record)
    }
}

fn advance(index: &mut usize, max: usize) -> Transition {
    let from = *index;
    if from > max {
        *index = max;
        return Transition::Clamped { from, to: max };
    }
    if from == max {
        return Transition::AtBound;
    }
    *index = from + 1;
    Transition::Moved { from, to: from + 1 }
}

fn retreat(index: &mut usize) -> Transition {
    let from = *index;
    if from == 0 {
        return Transition::AtBound;
    }
    *index = from - 1;
    Transition::Moved { from, to: from - 1 }
}

fn jump(index: &mut usize, target: usize, max: usize) -> Transition {
    let from = *index;
    let to = target.min(max);
    if from == to {
        return Transition::AtBound;
    }
    *index = to;
    if to == target {
        Transition::Moved { from, to }
    } else {
        Transition::Clamped { from, to }
    }
}

fn clamp(index: &mut usize, max: usize) -> Transition {
    let from = *index;
    if from <= max {
        return Transition::AtBound;
    }
    *index = max;
    Transition::Clamped { from, to: max }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_step_stops_at_max() {
        let mut state = ProgressState::new();
        assert_eq!(state.next_step(1), Transition::Moved { from: 0, to: 1 });
        assert_eq!(state.next_step(1), Transition::AtBound);
        assert_eq!(state.step_index(), 1);
    }

    #[test]
    fn prev_step_at_zero_is_noop() {
        let mut state = ProgressState::new();
        assert_eq!(state.prev_step(), Transition::AtBound);
        assert_eq!(state.step_index(), 0);
    }

    #[test]
    fn shrunk_bound_clamps_on_next_access() {
        let mut state = ProgressState::new();
        assert!(state.set_page(4, 10).changed());

        assert_eq!(state.next_page(2), Transition::Clamped { from: 4, to: 2 });
        assert_eq!(state.page_index(), 2);
        assert_eq!(state.clamp_page(2), Transition::AtBound);
    }

    #[test]
    fn set_step_clamps_target() {
        let mut state = ProgressState::new();
        assert_eq!(state.set_step(9, 3), Transition::Clamped { from: 0, to: 3 });
        assert_eq!(state.set_step(3, 3), Transition::AtBound);
        assert_eq!(state.set_step(1, 3), Transition::Moved { from: 3, to: 1 });
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = ProgressState::new();
        assert!(state.toggle_checked(2));
        assert!(state.is_checked(2));
        assert!(!state.toggle_checked(2));
        assert!(state.checked().is_empty());
    }

    #[test]
    fn all_checked_requires_nonempty_range() {
        let mut state = ProgressState::new();
        assert!(!state.all_checked(0..0));
        state.set_checked([5, 6, 7].into_iter().collect());
        assert!(state.all_checked(5..8));
        assert!(!state.all_checked(4..8));
    }

    #[test]
    fn reset_keeps_preferences() {
        let mut state = ProgressState::new();
        let _ = state.next_step(5);
        let _ = state.next_page(5);
        state.toggle_checked(0);
        state.set_mode_preference(ModePreference::ForceFullList);
        state.set_voice_control(true);

        state.reset();

        assert_eq!(state.step_index(), 0);
        assert_eq!(state.page_index(), 0);
        assert!(state.checked().is_empty());
        assert_eq!(state.mode_preference(), ModePreference::ForceFullList);
        assert!(state.voice_control());
    }

    #[test]
    fn record_roundtrip() {
        let mut state = ProgressState::new();
        let _ = state.set_step(2, 5);
        state.toggle_checked(3);
        state.set_voice_control(true);

        assert_eq!(ProgressState::from(state.to_record()), state);
    }
}
