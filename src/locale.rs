use serde::{Deserialize, Serialize};

use crate::DayOfWeek;

pub(crate) const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub(crate) const ENGLISH_MONTHS_SHORT: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

pub(crate) const ENGLISH_WEEKDAYS: [&str; 7] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

pub(crate) const ENGLISH_WEEKDAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month and weekday names for one locale.
///
/// The engine does not compute localized names; hosts inject a dictionary
/// and the engine only indexes into it. Weekday tables are Sunday-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleNames {
    pub months:         [String; 12],
    pub months_short:   [String; 12],
    pub weekdays:       [String; 7],
    pub weekdays_short: [String; 7],
    pub am:             String,
    pub pm:             String,
}

impl LocaleNames {
    pub fn english() -> Self {
        Self {
            months:         ENGLISH_MONTHS.map(str::to_owned),
            months_short:   ENGLISH_MONTHS_SHORT.map(str::to_owned),
            weekdays:       ENGLISH_WEEKDAYS.map(str::to_owned),
            weekdays_short: ENGLISH_WEEKDAYS_SHORT.map(str::to_owned),
            am:             "AM".to_owned(),
            pm:             "PM".to_owned(),
        }
    }

    /// Full month name for a 0-based month
    pub fn month(&self, month0: u32) -> &str {
        &self.months[month0 as usize % 12]
    }

    pub fn month_short(&self, month0: u32) -> &str {
        &self.months_short[month0 as usize % 12]
    }

    pub fn weekday(&self, day: DayOfWeek) -> &str {
        &self.weekdays[usize::from(day.get())]
    }

    pub fn weekday_short(&self, day: DayOfWeek) -> &str {
        &self.weekdays_short[usize::from(day.get())]
    }

    /// Short weekday names in display order for a week starting on `first_day`.
    pub fn weekday_headers(&self, first_day: DayOfWeek) -> Vec<&str> {
        first_day.week_from().map(|day| self.weekday_short(day)).collect()
    }
}

impl Default for LocaleNames {
    fn default() -> Self {
        Self::english()
    }
}
