use crate::{CalendarDate, DateInput};

/// Inclusive minimum/maximum limits on selectable dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
}

impl Bounds {
    pub const UNBOUNDED: Self = Self { min: None, max: None };

    pub const fn new(min: Option<CalendarDate>, max: Option<CalendarDate>) -> Self {
        Self { min, max }
    }

    /// Builds bounds from raw inputs, coercing each through the date parser.
    pub fn from_inputs(min: &DateInput, max: &DateInput, pattern: Option<&str>) -> Self {
        Self::new(min.resolve(pattern), max.resolve(pattern))
    }

    pub const fn min(&self) -> Option<CalendarDate> {
        self.min
    }

    pub const fn max(&self) -> Option<CalendarDate> {
        self.max
    }

    /// Inclusive on both ends
    pub fn is_within(&self, date: &CalendarDate) -> bool {
        self.min.is_none_or(|min| *date >= min) && self.max.is_none_or(|max| *date <= max)
    }

    /// Pulls a date inside the limits. When `min > max` the minimum wins.
    pub fn clamp(&self, date: CalendarDate) -> CalendarDate {
        let date = self.max.map_or(date, |max| date.min(max));
        self.min.map_or(date, |min| date.max(min))
    }
}
