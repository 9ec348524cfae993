//! Selection state for the three picker modes.
//!
//! Grid clicks go through [`SelectionState::click`]; programmatic setters
//! bypass the click protocol and overwrite the state directly.

use indexmap::IndexSet;
use serde::Serialize;

use crate::{Bounds, CalendarDate, DateRange, SelectionMode};

/// Where the two-click range protocol currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RangePhase {
    /// No endpoint chosen yet
    #[default]
    Idle,
    /// First click recorded; `start == end`
    Anchored,
    /// Both endpoints chosen; the next click starts over
    Complete,
}

/// What a grid click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickOutcome {
    Selected,
    Deselected,
    RangeAnchored,
    RangeCompleted,
}

/// The externally visible value of a selection, shaped per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selection {
    Single(Option<CalendarDate>),
    Range(DateRange),
    Multiple(Vec<CalendarDate>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(date) => date.is_none(),
            Self::Range(range) => range.is_empty(),
            Self::Multiple(dates) => dates.is_empty(),
        }
    }

    pub const fn as_single(&self) -> Option<CalendarDate> {
        match self {
            Self::Single(date) => *date,
            Self::Range(_) | Self::Multiple(_) => None,
        }
    }

    pub const fn as_range(&self) -> Option<DateRange> {
        match self {
            Self::Range(range) => Some(*range),
            Self::Single(_) | Self::Multiple(_) => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[CalendarDate]> {
        match self {
            Self::Multiple(dates) => Some(dates.as_slice()),
            Self::Single(_) | Self::Range(_) => None,
        }
    }
}

/// Pending and confirmed range, as seen by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentRange {
    pub start:     Option<CalendarDate>,
    pub end:       Option<CalendarDate>,
    pub confirmed: Option<DateRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RangeState {
    pending:   DateRange,
    confirmed: Option<DateRange>,
    phase:     RangePhase,
    confirm:   bool,
}

impl RangeState {
    fn commit(&mut self, range: DateRange) {
        self.pending = range;
        self.phase = match (range.start(), range.end()) {
            (None, None) => RangePhase::Idle,
            (Some(start), Some(end)) if start != end => RangePhase::Complete,
            _ => RangePhase::Anchored,
        };
        if self.confirm {
            self.confirmed = (!range.is_empty()).then_some(range);
        }
    }

    fn click(&mut self, date: CalendarDate) -> ClickOutcome {
        match (self.phase, self.pending.start()) {
            (RangePhase::Anchored, Some(start)) => {
                self.pending = DateRange::new(Some(start), Some(date));
                self.phase = RangePhase::Complete;
                ClickOutcome::RangeCompleted
            },
            _ => {
                self.pending = DateRange::single(date);
                self.phase = RangePhase::Anchored;
                ClickOutcome::RangeAnchored
            },
        }
    }

    fn visible(&self) -> DateRange {
        if self.confirm { self.confirmed.unwrap_or_default() } else { self.pending }
    }
}

/// Current selection, parametrized by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    mode:     SelectionMode,
    single:   Option<CalendarDate>,
    multiple: IndexSet<CalendarDate>,
    range:    RangeState,
}

impl SelectionState {
    pub fn new(mode: SelectionMode, confirm_range: bool) -> Self {
        Self {
            mode,
            single: None,
            multiple: IndexSet::new(),
            range: RangeState {
                confirm: confirm_range,
                ..RangeState::default()
            },
        }
    }

    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub const fn confirm_range(&self) -> bool {
        self.range.confirm
    }

    pub const fn range_phase(&self) -> RangePhase {
        self.range.phase
    }

    /// Back to the empty state of the current mode
    pub fn clear(&mut self) {
        *self = Self::new(self.mode, self.range.confirm);
    }

    pub fn is_empty(&self) -> bool {
        self.value().is_empty() && self.range.pending.is_empty()
    }

    /// Programmatic assignment. Range mode anchors on `date`; multiple mode
    /// replaces the set with `date`.
    pub fn set_date(&mut self, date: Option<CalendarDate>) {
        match self.mode {
            SelectionMode::Single => self.single = date,
            SelectionMode::Multiple => self.multiple = date.into_iter().collect(),
            SelectionMode::Range => self.range.commit(date.map(DateRange::single).unwrap_or_default()),
        }
    }

    /// Programmatic range assignment; bypasses confirmation.
    pub fn set_range(&mut self, start: Option<CalendarDate>, end: Option<CalendarDate>) {
        self.range.commit(DateRange::new(start, end));
    }

    /// Replaces a multiple selection
    pub fn set_dates(&mut self, dates: impl IntoIterator<Item = CalendarDate>) {
        self.multiple = dates.into_iter().collect();
    }

    /// Applies a click. Callers are expected to have rejected disabled dates.
    pub fn click(&mut self, date: CalendarDate) -> ClickOutcome {
        match self.mode {
            SelectionMode::Single => {
                self.single = Some(date);
                ClickOutcome::Selected
            },
            SelectionMode::Multiple => {
                if self.multiple.shift_remove(&date) {
                    ClickOutcome::Deselected
                } else {
                    self.multiple.insert(date);
                    ClickOutcome::Selected
                }
            },
            SelectionMode::Range => self.range.click(date),
        }
    }

    /// Turns range confirmation on or off. Switching it off drops any
    /// unapplied pending range.
    pub fn set_confirm_range(&mut self, confirm: bool) {
        if confirm == self.range.confirm {
            return;
        }
        if confirm {
            let pending = self.range.pending;
            self.range.confirmed = (!pending.is_empty()).then_some(pending);
        } else {
            self.cancel_range();
            self.range.confirmed = None;
        }
        self.range.confirm = confirm;
    }

    /// Promotes a complete pending range to confirmed. Returns whether
    /// anything was applied.
    pub fn apply_range(&mut self) -> bool {
        if !self.range.confirm || !self.range.pending.is_complete() {
            return false;
        }
        self.range.confirmed = Some(self.range.pending);
        true
    }

    /// Discards the pending range, restoring the last confirmed one.
    pub fn cancel_range(&mut self) {
        if !self.range.confirm {
            return;
        }
        let restored = self.range.confirmed.unwrap_or_default();
        self.range.pending = restored;
        self.range.phase = if restored.is_complete() { RangePhase::Complete } else { RangePhase::Idle };
    }

    /// The externally visible selection. With range confirmation this is the
    /// last confirmed range.
    pub fn value(&self) -> Selection {
        match self.mode {
            SelectionMode::Single => Selection::Single(self.single),
            SelectionMode::Multiple => Selection::Multiple(self.multiple.iter().copied().collect()),
            SelectionMode::Range => Selection::Range(self.range.visible()),
        }
    }

    /// Pending and confirmed range; `None` outside range mode.
    pub fn current_range(&self) -> Option<CurrentRange> {
        (self.mode == SelectionMode::Range).then(|| CurrentRange {
            start:     self.range.pending.start(),
            end:       self.range.pending.end(),
            confirmed: self.range.confirmed,
        })
    }

    /// The range drawn on the grid: pending while a range is being picked.
    pub const fn displayed_range(&self) -> DateRange {
        self.range.pending
    }

    pub fn is_selected(&self, date: &CalendarDate) -> bool {
        match self.mode {
            SelectionMode::Single => self.single.as_ref() == Some(date),
            SelectionMode::Multiple => self.multiple.contains(date),
            SelectionMode::Range => self.range.pending.is_endpoint(date),
        }
    }

    pub fn is_in_range(&self, date: &CalendarDate) -> bool {
        self.mode == SelectionMode::Range && self.range.pending.contains(date)
    }

    /// Drops every selected date outside `bounds`. A range goes as a whole
    /// when either endpoint is out; with confirmation on, a dropped pending
    /// range is replaced by the confirmed one. Returns whether anything
    /// changed.
    pub fn retain_within(&mut self, bounds: &Bounds) -> bool {
        let before = self.clone();
        let range_ok = |range: &DateRange| {
            range.start().is_none_or(|d| bounds.is_within(&d)) && range.end().is_none_or(|d| bounds.is_within(&d))
        };

        if self.single.is_some_and(|d| !bounds.is_within(&d)) {
            self.single = None;
        }
        self.multiple.retain(|d| bounds.is_within(d));
        if self.range.confirmed.is_some_and(|r| !range_ok(&r)) {
            self.range.confirmed = None;
        }
        if !range_ok(&self.range.pending) {
            self.range.pending = DateRange::EMPTY;
            self.range.phase = RangePhase::Idle;
            // fall back to whatever confirmed range survived
            self.cancel_range();
        }

        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_initial_state_is_empty() {
        for mode in [SelectionMode::Single, SelectionMode::Range, SelectionMode::Multiple] {
            let state = SelectionState::new(mode, false);
            assert!(state.is_empty(), "{mode}");
            assert!(state.value().is_empty(), "{mode}");
        }
        assert_eq!(SelectionState::new(SelectionMode::Single, false).value(), Selection::Single(None));
        assert_eq!(SelectionState::new(SelectionMode::Range, false).value(), Selection::Range(DateRange::EMPTY));
        assert_eq!(SelectionState::new(SelectionMode::Multiple, false).value(), Selection::Multiple(vec![]));
    }

    #[test]
    fn test_single_set_and_clear() {
        let mut state = SelectionState::new(SelectionMode::Single, false);
        state.set_date(Some(date(2024, 1, 15)));
        assert_eq!(state.value().as_single(), Some(date(2024, 1, 15)));
        assert!(state.is_selected(&date(2024, 1, 15)));

        state.set_date(None);
        assert_eq!(state.value(), Selection::Single(None));
    }

    #[test]
    fn test_single_click_replaces() {
        let mut state = SelectionState::new(SelectionMode::Single, false);
        state.click(date(2024, 1, 15));
        assert_eq!(state.click(date(2024, 1, 16)), ClickOutcome::Selected);
        assert_eq!(state.value().as_single(), Some(date(2024, 1, 16)));
    }

    #[test]
    fn test_multiple_toggles_and_keeps_order() {
        let mut state = SelectionState::new(SelectionMode::Multiple, false);
        state.click(date(2024, 1, 20));
        state.click(date(2024, 1, 5));
        state.click(date(2024, 1, 12));
        assert_eq!(
            state.value().as_multiple(),
            Some(&[date(2024, 1, 20), date(2024, 1, 5), date(2024, 1, 12)][..])
        );

        assert_eq!(state.click(date(2024, 1, 5)), ClickOutcome::Deselected);
        assert_eq!(state.value().as_multiple(), Some(&[date(2024, 1, 20), date(2024, 1, 12)][..]));
        assert!(!state.is_selected(&date(2024, 1, 5)));
    }

    #[test]
    fn test_range_two_click_protocol() {
        let mut state = SelectionState::new(SelectionMode::Range, false);

        assert_eq!(state.click(date(2024, 1, 15)), ClickOutcome::RangeAnchored);
        let range = state.value().as_range().expect("range value");
        assert_eq!((range.start(), range.end()), (Some(date(2024, 1, 15)), Some(date(2024, 1, 15))));

        assert_eq!(state.click(date(2024, 1, 20)), ClickOutcome::RangeCompleted);
        let range = state.value().as_range().expect("range value");
        assert_eq!((range.start(), range.end()), (Some(date(2024, 1, 15)), Some(date(2024, 1, 20))));
        assert!(state.is_in_range(&date(2024, 1, 17)));

        // third click starts over
        assert_eq!(state.click(date(2024, 2, 1)), ClickOutcome::RangeAnchored);
        let range = state.value().as_range().expect("range value");
        assert_eq!((range.start(), range.end()), (Some(date(2024, 2, 1)), Some(date(2024, 2, 1))));
    }

    #[test]
    fn test_range_reverse_clicks_swap() {
        let mut state = SelectionState::new(SelectionMode::Range, false);
        state.click(date(2024, 1, 20));
        state.click(date(2024, 1, 15));

        let range = state.value().as_range().expect("range value");
        assert_eq!(range.start(), Some(date(2024, 1, 15)));
        assert_eq!(range.end(), Some(date(2024, 1, 20)));
    }

    #[test]
    fn test_range_always_ordered() {
        let days = [date(2024, 3, 9), date(2024, 1, 2), date(2024, 2, 29), date(2024, 2, 29), date(2023, 12, 31)];
        for a in days {
            for b in days {
                let mut state = SelectionState::new(SelectionMode::Range, false);
                state.click(a);
                state.click(b);
                let range = state.value().as_range().expect("range value");
                assert!(range.start() <= range.end(), "{a} then {b}");
            }
        }
    }

    #[test]
    fn test_set_range_programmatic() {
        let mut state = SelectionState::new(SelectionMode::Range, false);
        state.set_range(Some(date(2024, 1, 20)), Some(date(2024, 1, 15)));
        assert_eq!(state.range_phase(), RangePhase::Complete);
        let range = state.value().as_range().expect("range value");
        assert_eq!(range.start(), Some(date(2024, 1, 15)));

        // next click starts a new range
        state.click(date(2024, 3, 1));
        assert_eq!(state.range_phase(), RangePhase::Anchored);
    }

    #[test]
    fn test_confirm_range_keeps_confirmed_until_applied() {
        let mut state = SelectionState::new(SelectionMode::Range, true);
        state.click(date(2024, 1, 15));
        state.click(date(2024, 1, 20));

        assert_eq!(state.value(), Selection::Range(DateRange::EMPTY));
        let current = state.current_range().expect("range mode");
        assert_eq!(current.start, Some(date(2024, 1, 15)));
        assert_eq!(current.end, Some(date(2024, 1, 20)));
        assert_eq!(current.confirmed, None);

        assert!(state.apply_range());
        let confirmed = state.value().as_range().expect("range value");
        assert_eq!(confirmed.end(), Some(date(2024, 1, 20)));

        // a new pending range does not touch the confirmed one
        state.click(date(2024, 2, 1));
        state.click(date(2024, 2, 3));
        assert_eq!(state.value().as_range(), Some(confirmed));
    }

    #[test]
    fn test_confirm_range_cancel_restores() {
        let mut state = SelectionState::new(SelectionMode::Range, true);
        state.set_range(Some(date(2024, 1, 15)), Some(date(2024, 1, 20)));
        state.click(date(2024, 2, 1));

        state.cancel_range();
        let current = state.current_range().expect("range mode");
        assert_eq!(current.start, Some(date(2024, 1, 15)));
        assert_eq!(current.end, Some(date(2024, 1, 20)));
        assert_eq!(state.range_phase(), RangePhase::Complete);
    }

    #[test]
    fn test_apply_requires_complete_pending() {
        let mut state = SelectionState::new(SelectionMode::Range, true);
        assert!(!state.apply_range());
        state.set_range(Some(date(2024, 1, 15)), None);
        state.cancel_range();
        assert!(!state.apply_range());

        let mut plain = SelectionState::new(SelectionMode::Range, false);
        plain.set_range(Some(date(2024, 1, 15)), Some(date(2024, 1, 20)));
        assert!(!plain.apply_range());
    }

    #[test]
    fn test_toggle_confirmation() {
        let mut state = SelectionState::new(SelectionMode::Range, false);
        state.set_range(Some(date(2024, 1, 15)), Some(date(2024, 1, 20)));

        state.set_confirm_range(true);
        let range = state.value().as_range().expect("range value");
        assert_eq!(range.start(), Some(date(2024, 1, 15)));

        state.click(date(2024, 3, 1));
        state.set_confirm_range(false);
        let range = state.value().as_range().expect("range value");
        assert_eq!(range.start(), Some(date(2024, 1, 15)));
        assert_eq!(state.current_range().and_then(|c| c.confirmed), None);
    }

    #[test]
    fn test_current_range_outside_range_mode() {
        assert_eq!(SelectionState::new(SelectionMode::Single, false).current_range(), None);
    }

    #[test]
    fn test_retain_within_drops_invalid() {
        let bounds = Bounds::new(Some(date(2024, 6, 1)), None);

        let mut single = SelectionState::new(SelectionMode::Single, false);
        single.set_date(Some(date(2024, 1, 1)));
        assert!(single.retain_within(&bounds));
        assert_eq!(single.value(), Selection::Single(None));

        let mut multiple = SelectionState::new(SelectionMode::Multiple, false);
        multiple.set_dates([date(2024, 1, 1), date(2024, 7, 1)]);
        assert!(multiple.retain_within(&bounds));
        assert_eq!(multiple.value().as_multiple(), Some(&[date(2024, 7, 1)][..]));

        let mut range = SelectionState::new(SelectionMode::Range, false);
        range.set_range(Some(date(2024, 5, 20)), Some(date(2024, 6, 10)));
        assert!(range.retain_within(&bounds));
        assert!(range.value().is_empty());

        let mut kept = SelectionState::new(SelectionMode::Single, false);
        kept.set_date(Some(date(2024, 7, 1)));
        assert!(!kept.retain_within(&bounds));
    }

    #[test]
    fn test_retain_within_restores_confirmed_range() {
        let mut state = SelectionState::new(SelectionMode::Range, true);
        state.click(date(2024, 1, 10));
        state.click(date(2024, 1, 12));
        assert!(state.apply_range());
        state.click(date(2024, 1, 20));
        state.click(date(2024, 1, 25));

        assert!(state.retain_within(&Bounds::new(None, Some(date(2024, 1, 22)))));

        let confirmed = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 12)));
        assert_eq!(state.value(), Selection::Range(confirmed));
        assert_eq!(state.displayed_range(), confirmed);
        assert_eq!(state.range_phase(), RangePhase::Complete);
        assert!(state.is_selected(&date(2024, 1, 10)));
        assert!(state.is_in_range(&date(2024, 1, 11)));
        let current = state.current_range().expect("range mode");
        assert_eq!((current.start, current.end), (confirmed.start(), confirmed.end()));

        // both out of bounds: nothing left to fall back to
        assert!(state.retain_within(&Bounds::new(Some(date(2024, 2, 1)), None)));
        assert!(state.value().is_empty());
        assert_eq!(state.displayed_range(), DateRange::EMPTY);
        assert_eq!(state.range_phase(), RangePhase::Idle);
    }

    #[test]
    fn test_selection_payload_shapes() {
        let single = serde_json::to_string(&Selection::Single(Some(date(2024, 1, 15)))).expect("serialize");
        assert_eq!(single, r#""2024-01-15""#);

        let multiple = serde_json::to_string(&Selection::Multiple(vec![date(2024, 1, 15)])).expect("serialize");
        assert_eq!(multiple, r#"["2024-01-15"]"#);

        let empty = serde_json::to_string(&Selection::Single(None)).expect("serialize");
        assert_eq!(empty, "null");
    }
}
