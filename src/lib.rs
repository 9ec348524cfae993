//! Date and selection engine for a text-input-bound calendar widget.
//!
//! The crate covers the parts of a date picker that have nothing to do with
//! drawing: parsing and formatting dates, laying out month grids, evaluating
//! disabled-date rules, and holding the single/range/multiple selection.
//! A view layer forwards user intent to [`DatePicker`] and renders the
//! [`MonthGrid`] it gets back.

mod bounds;
mod clock;
mod consts;
mod format;
mod grid;
mod input;
mod locale;
mod options;
mod picker;
mod prelude;
mod range;
mod rules;
mod selection;
mod types;

pub use bounds::Bounds;
pub use clock::{Clock, FixedClock, SystemClock};
pub use consts::*;
pub use format::{format_date, format_date_time, format_localized, parse_date};
pub use grid::{CalendarCell, MonthGrid, Week, build_month};
pub use input::DateInput;
pub use locale::LocaleNames;
pub use options::{
    Callbacks, ChangeHook, Hook, MonthChangeHook, Options, OptionsPatch, Placement, Position, RangeInput, SelectHook,
    TimeChangeHook, YearChangeHook, merge,
};
pub use picker::{DatePicker, ElementId, MonthOption, PickerError, ResolveTarget};
pub use range::{DateRange, DateSpan, RangeError};
pub use rules::{DisableFunction, DisabledReason, DisabledRuleSet, PredicateError};
pub use selection::{ClickOutcome, CurrentRange, RangePhase, Selection, SelectionState};
pub use types::{DayOfWeek, SelectionMode, TimeOfDay};

use crate::prelude::*;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use std::str::FromStr;

/// A local calendar day with no time-of-day and no timezone.
///
/// Built from year/month/day components directly, never from an instant, so a
/// `YYYY-MM-DD` string always lands on that calendar day no matter what offset
/// the host runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display(fmt = "{:04}-{:02}-{:02}", "_0.year()", "_0.month()", "_0.day()")]
pub struct CalendarDate(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be 1-12)", "_0")]
    InvalidMonth(u32),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[display(fmt = "Invalid day of week: {} (must be 0-6)", "_0")]
    InvalidDayOfWeek(u8),
    #[display(fmt = "Invalid time {hours:02}:{minutes:02}:{seconds:02}")]
    InvalidTime { hours: u8, minutes: u8, seconds: u8 },
    #[display(fmt = "Invalid selection mode: {_0} (expected single, range or multiple)")]
    InvalidMode(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date from a 1-based month and day, rejecting out-of-range parts.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` or `ParseError::InvalidDay`.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ParseError> {
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(ParseError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(ParseError::InvalidDay { year, month, day })
    }

    /// Creates a date from a 0-based month and a day, letting either overflow
    /// into the following unit: month 12 is January of the next year and day 0
    /// is the last day of the previous month.
    ///
    /// Returns `None` only when the result falls outside chrono's date range.
    pub fn from_overflowing(year: i64, month0: i64, day: i64) -> Option<Self> {
        let months = year.checked_mul(i64::from(MONTHS_PER_YEAR))?.checked_add(month0)?;
        let y = i32::try_from(months.div_euclid(i64::from(MONTHS_PER_YEAR))).ok()?;
        let m0 = u32::try_from(months.rem_euclid(i64::from(MONTHS_PER_YEAR))).ok()?;
        Self::first_of_month(y, m0)?.add_days(day.checked_sub(1)?)
    }

    /// First day of the given 0-based month.
    pub fn first_of_month(year: i32, month0: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month number, 1-based (January = 1)
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Month index, 0-based (January = 0)
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> DayOfWeek {
        self.0.weekday().into()
    }

    /// Number of days in this date's month
    pub fn days_in_month(&self) -> u32 {
        // only December of chrono's last year has no following month
        Self::from_overflowing(i64::from(self.year()), i64::from(self.month0()) + 1, 0)
            .map_or(31, |last| last.day())
    }

    /// ISO-8601 week number
    pub fn iso_week(&self) -> u32 {
        self.0.iso_week().week()
    }

    /// Returns the underlying chrono date
    pub const fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Shifts by a signed number of days; `None` past chrono's range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.0.checked_add_days(magnitude).map(Self)
        } else {
            self.0.checked_sub_days(magnitude).map(Self)
        }
    }

    pub fn is_same_day(&self, other: &Self) -> bool {
        self == other
    }
}

impl From<NaiveDateTime> for CalendarDate {
    fn from(value: NaiveDateTime) -> Self {
        Self(value.date())
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        parse_date(trimmed, None).ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
