use std::str::FromStr;

use serde::Serialize;

use crate::{CalendarDate, ParseError, RANGE_SEPARATOR, prelude::*};

/// A closed span of calendar days (inclusive on both ends).
/// Endpoints given out of order are swapped, so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateSpan {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Why `start/end` text did not parse as a [`DateSpan`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateSpan {
    /// Creates a span, ordering the endpoints.
    pub fn new(a: CalendarDate, b: CalendarDate) -> Self {
        if a <= b { Self { start: a, end: b } } else { Self { start: b, end: a } }
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

impl FromStr for DateSpan {
    type Err = RangeError;

    /// Parses `start/end`; endpoints may be reversed and surrounded by spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(RANGE_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None) => Ok(Self::new(start.parse()?, end.parse()?)),
            (_, None, _) => Err(RangeError::InvalidFormat(format!(
                "missing '{RANGE_SEPARATOR}' between endpoints: {s}"
            ))),
            _ => Err(RangeError::InvalidFormat(format!("more than one '{RANGE_SEPARATOR}' in: {s}"))),
        }
    }
}

/// A selection range whose endpoints may be missing.
///
/// When both endpoints are present `start <= end`; out-of-order input is
/// swapped rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: Option<CalendarDate>,
    end:   Option<CalendarDate>,
}

impl DateRange {
    pub const EMPTY: Self = Self { start: None, end: None };

    /// Creates a range, swapping the endpoints when both are present and
    /// `start > end`.
    pub fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if s > e => Self {
                start: Some(e),
                end:   Some(s),
            },
            _ => Self { start, end },
        }
    }

    /// A range anchored on a single day (`start == end`)
    pub const fn single(date: CalendarDate) -> Self {
        Self {
            start: Some(date),
            end:   Some(date),
        }
    }

    pub const fn start(&self) -> Option<CalendarDate> {
        self.start
    }

    pub const fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both endpoints present
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The closed span, when both endpoints are present
    pub fn span(&self) -> Option<DateSpan> {
        Some(DateSpan::new(self.start?, self.end?))
    }

    /// Inclusive containment; an incomplete range contains nothing
    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.span().is_some_and(|span| span.contains(date))
    }

    /// Either endpoint equals `date`
    pub fn is_endpoint(&self, date: &CalendarDate) -> bool {
        self.start.as_ref() == Some(date) || self.end.as_ref() == Some(date)
    }
}

impl From<DateSpan> for DateRange {
    fn from(span: DateSpan) -> Self {
        Self {
            start: Some(span.start),
            end:   Some(span.end),
        }
    }
}
