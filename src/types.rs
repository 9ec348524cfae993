use crate::ParseError;
use crate::consts::{DAYS_PER_WEEK, SATURDAY, SUNDAY};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A day of the week in the range `0..=6`, where 0 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const SUNDAY: Self = Self(SUNDAY);
    pub const SATURDAY: Self = Self(SATURDAY);

    /// Creates a new day of week, validating that it's below `DAYS_PER_WEEK`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDayOfWeek` if the value is > 6.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        if value >= DAYS_PER_WEEK {
            return Err(ParseError::InvalidDayOfWeek(value));
        }
        Ok(Self(value))
    }

    /// Returns the day number (0 = Sunday)
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Saturday or Sunday
    pub const fn is_weekend(self) -> bool {
        self.0 == SUNDAY || self.0 == SATURDAY
    }

    /// Number of days from `start` forward to `self` (0..=6).
    pub const fn days_since(self, start: Self) -> u8 {
        (self.0 + DAYS_PER_WEEK - start.0) % DAYS_PER_WEEK
    }

    /// Iterates over the seven days starting at `self`.
    pub fn week_from(self) -> impl Iterator<Item = Self> {
        (0..DAYS_PER_WEEK).map(move |offset| Self((self.0 + offset) % DAYS_PER_WEEK))
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(weekday: chrono::Weekday) -> Self {
        // num_days_from_sunday is always 0..=6
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.0
    }
}

impl Default for DayOfWeek {
    fn default() -> Self {
        Self::SUNDAY
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wall-clock time used when time selection is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{hours:02}:{minutes:02}:{seconds:02}")]
pub struct TimeOfDay {
    hours:   u8,
    minutes: u8,
    seconds: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self {
        hours:   0,
        minutes: 0,
        seconds: 0,
    };

    /// Creates a new time of day
    ///
    /// # Errors
    /// Returns `ParseError::InvalidTime` if hours > 23 or minutes/seconds > 59.
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Result<Self, ParseError> {
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(ParseError::InvalidTime {
                hours,
                minutes,
                seconds,
            });
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Hour on a 12-hour clock (1..=12)
    pub const fn hours12(&self) -> u8 {
        match self.hours % 12 {
            0 => 12,
            h => h,
        }
    }

    pub const fn is_pm(&self) -> bool {
        self.hours >= 12
    }
}

impl From<chrono::NaiveTime> for TimeOfDay {
    fn from(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        // NaiveTime components are always in range; leap seconds fold into 59
        Self {
            hours:   time.hour() as u8,
            minutes: time.minute() as u8,
            seconds: time.second().min(59) as u8,
        }
    }
}

/// How clicks on the grid build up the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    #[display(fmt = "single")]
    Single,
    #[display(fmt = "range")]
    Range,
    #[display(fmt = "multiple")]
    Multiple,
}

impl FromStr for SelectionMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single" => Ok(Self::Single),
            "range" => Ok(Self::Range),
            "multiple" => Ok(Self::Multiple),
            other => Err(ParseError::InvalidMode(other.to_owned())),
        }
    }
}
