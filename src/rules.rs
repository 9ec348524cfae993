//! Disabled-date rules.
//!
//! A [`DisabledRuleSet`] folds every configured restriction into a single
//! predicate. Evaluation is pure: "today" is a parameter, and the only side
//! effect is a one-time warning when a custom predicate fails.

use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexSet;

use crate::{Bounds, CalendarDate, DateSpan, DayOfWeek, prelude::*};

/// Error a fallible disable predicate may return.
pub type PredicateError = Box<dyn std::error::Error + Send + Sync>;

type Predicate = dyn Fn(CalendarDate) -> Result<bool, PredicateError> + Send + Sync;

/// A user-supplied predicate that adds restrictions on top of the built-in rules.
///
/// A predicate that returns an error or panics leaves the date enabled. The
/// first failure of each predicate is logged; later failures are silent.
#[derive(Clone)]
pub struct DisableFunction {
    predicate: Arc<Predicate>,
    reported:  Arc<AtomicBool>,
}

impl DisableFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(CalendarDate) -> bool + Send + Sync + 'static,
    {
        Self::fallible(move |date| Ok(f(date)))
    }

    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(CalendarDate) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(f),
            reported:  Arc::new(AtomicBool::new(false)),
        }
    }

    fn evaluate(&self, date: CalendarDate) -> bool {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.predicate)(date)))
            .unwrap_or_else(|_| Err("disable function panicked".into()));
        match outcome {
            Ok(disabled) => disabled,
            Err(err) => {
                if !self.reported.swap(true, Ordering::Relaxed) {
                    warn!(%date, error = %err, "disable function failed, treating date as enabled");
                }
                false
            },
        }
    }
}

impl fmt::Debug for DisableFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisableFunction")
            .field("reported", &self.reported.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Which rule disabled a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DisabledReason {
    #[display(fmt = "outside min/max bounds")]
    OutOfBounds,
    #[display(fmt = "not in the enabled dates")]
    NotEnabled,
    #[display(fmt = "explicitly disabled")]
    DisabledDate,
    #[display(fmt = "inside disabled range {_0}")]
    DisabledRange(DateSpan),
    #[display(fmt = "disabled day of week {_0}")]
    DayOfWeek(DayOfWeek),
    #[display(fmt = "weekend")]
    Weekend,
    #[display(fmt = "before today")]
    Past,
    #[display(fmt = "after today")]
    Future,
    #[display(fmt = "rejected by disable function")]
    Predicate,
}

/// Every configured disabling constraint.
#[derive(Debug, Clone, Default)]
pub struct DisabledRuleSet {
    dates:            IndexSet<CalendarDate>,
    ranges:           IndexSet<DateSpan>,
    days_of_week:     BTreeSet<DayOfWeek>,
    disable_weekends: bool,
    block_past:       bool,
    block_future:     bool,
    enabled:          IndexSet<CalendarDate>,
    predicate:        Option<DisableFunction>,
}

impl DisabledRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disabled(&self, date: CalendarDate, bounds: &Bounds, today: CalendarDate) -> bool {
        self.disabled_reason(date, bounds, today).is_some()
    }

    /// The first rule that disables `date`, or `None` when it is selectable.
    ///
    /// Bounds always apply. A non-empty allow-list then decides on its own;
    /// otherwise the block rules run in order with the custom predicate last.
    pub fn disabled_reason(&self, date: CalendarDate, bounds: &Bounds, today: CalendarDate) -> Option<DisabledReason> {
        if !bounds.is_within(&date) {
            return Some(DisabledReason::OutOfBounds);
        }
        if !self.enabled.is_empty() {
            return (!self.enabled.contains(&date)).then_some(DisabledReason::NotEnabled);
        }
        if self.dates.contains(&date) {
            return Some(DisabledReason::DisabledDate);
        }
        if let Some(span) = self.ranges.iter().find(|span| span.contains(&date)) {
            return Some(DisabledReason::DisabledRange(*span));
        }

        let weekday = date.weekday();
        if self.days_of_week.contains(&weekday) {
            return Some(DisabledReason::DayOfWeek(weekday));
        }
        if self.disable_weekends && weekday.is_weekend() {
            return Some(DisabledReason::Weekend);
        }
        if self.block_past && date < today {
            return Some(DisabledReason::Past);
        }
        if self.block_future && date > today {
            return Some(DisabledReason::Future);
        }
        if self.predicate.as_ref().is_some_and(|p| p.evaluate(date)) {
            return Some(DisabledReason::Predicate);
        }
        None
    }

    // --- explicit dates ---

    pub fn add_dates(&mut self, dates: impl IntoIterator<Item = CalendarDate>) -> &mut Self {
        self.dates.extend(dates);
        self
    }

    pub fn remove_dates(&mut self, dates: impl IntoIterator<Item = CalendarDate>) -> &mut Self {
        for date in dates {
            self.dates.shift_remove(&date);
        }
        self
    }

    pub fn clear_dates(&mut self) -> &mut Self {
        self.dates.clear();
        self
    }

    pub const fn dates(&self) -> &IndexSet<CalendarDate> {
        &self.dates
    }

    // --- date ranges ---

    pub fn add_range(&mut self, span: DateSpan) -> &mut Self {
        self.ranges.insert(span);
        self
    }

    /// Removes a range equal to `span` (after endpoint ordering)
    pub fn remove_range(&mut self, span: DateSpan) -> &mut Self {
        self.ranges.shift_remove(&span);
        self
    }

    pub fn clear_ranges(&mut self) -> &mut Self {
        self.ranges.clear();
        self
    }

    pub const fn ranges(&self) -> &IndexSet<DateSpan> {
        &self.ranges
    }

    // --- days of week ---

    pub fn set_days_of_week(&mut self, days: impl IntoIterator<Item = DayOfWeek>) -> &mut Self {
        self.days_of_week = days.into_iter().collect();
        self
    }

    pub fn add_days_of_week(&mut self, days: impl IntoIterator<Item = DayOfWeek>) -> &mut Self {
        self.days_of_week.extend(days);
        self
    }

    pub fn remove_days_of_week(&mut self, days: impl IntoIterator<Item = DayOfWeek>) -> &mut Self {
        for day in days {
            self.days_of_week.remove(&day);
        }
        self
    }

    pub fn clear_days_of_week(&mut self) -> &mut Self {
        self.days_of_week.clear();
        self
    }

    pub const fn days_of_week(&self) -> &BTreeSet<DayOfWeek> {
        &self.days_of_week
    }

    // --- flags ---

    pub const fn set_disable_weekends(&mut self, disable: bool) -> &mut Self {
        self.disable_weekends = disable;
        self
    }

    pub const fn disable_weekends(&self) -> bool {
        self.disable_weekends
    }

    pub const fn set_block_past(&mut self, block: bool) -> &mut Self {
        self.block_past = block;
        self
    }

    pub const fn block_past(&self) -> bool {
        self.block_past
    }

    pub const fn set_block_future(&mut self, block: bool) -> &mut Self {
        self.block_future = block;
        self
    }

    pub const fn block_future(&self) -> bool {
        self.block_future
    }

    // --- allow-list ---

    /// Replaces the allow-list. A non-empty list overrides every block rule.
    pub fn set_enabled_dates(&mut self, dates: impl IntoIterator<Item = CalendarDate>) -> &mut Self {
        self.enabled = dates.into_iter().collect();
        self
    }

    pub fn add_enabled_dates(&mut self, dates: impl IntoIterator<Item = CalendarDate>) -> &mut Self {
        self.enabled.extend(dates);
        self
    }

    pub fn clear_enabled_dates(&mut self) -> &mut Self {
        self.enabled.clear();
        self
    }

    pub const fn enabled_dates(&self) -> &IndexSet<CalendarDate> {
        &self.enabled
    }

    // --- predicate ---

    pub fn set_predicate(&mut self, predicate: Option<DisableFunction>) -> &mut Self {
        self.predicate = predicate;
        self
    }

    pub const fn predicate(&self) -> Option<&DisableFunction> {
        self.predicate.as_ref()
    }
}
