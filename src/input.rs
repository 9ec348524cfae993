use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::{CalendarDate, TimeOfDay, format::parse_date};

/// Anything the engine accepts where a date is expected.
///
/// Values are coerced to a [`CalendarDate`] once, when they are assigned,
/// using the active display pattern for text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateInput {
    /// No date; clears the target it is assigned to
    #[default]
    Empty,
    Date(CalendarDate),
    /// A date with a clock time; the time is dropped for day comparisons
    DateTime(NaiveDateTime),
    Text(String),
}

impl DateInput {
    /// Coerces to a calendar day. Text goes through [`parse_date`]; anything
    /// unparseable resolves to `None`.
    pub fn resolve(&self, pattern: Option<&str>) -> Option<CalendarDate> {
        match self {
            Self::Empty => None,
            Self::Date(date) => Some(*date),
            Self::DateTime(datetime) => Some((*datetime).into()),
            Self::Text(text) => parse_date(text, pattern),
        }
    }

    /// The clock time carried by the input, if any
    pub fn time(&self) -> Option<TimeOfDay> {
        match self {
            Self::DateTime(datetime) => Some(datetime.time().into()),
            Self::Empty | Self::Date(_) | Self::Text(_) => None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<CalendarDate> for DateInput {
    fn from(date: CalendarDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date.into())
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::DateTime(datetime)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for DateInput {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl<T: Into<Self>> From<Option<T>> for DateInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl<'de> Deserialize<'de> for DateInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_resolve_variants() {
        assert_eq!(DateInput::Empty.resolve(None), None);
        assert_eq!(DateInput::from(date(2024, 1, 15)).resolve(None), Some(date(2024, 1, 15)));
        assert_eq!(DateInput::from("2024-01-15").resolve(None), Some(date(2024, 1, 15)));
        assert_eq!(DateInput::from("garbage").resolve(None), None);
    }

    #[test]
    fn test_resolve_datetime_drops_time() {
        let datetime = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(23, 30, 0))
            .expect("valid datetime");
        let input = DateInput::from(datetime);
        assert_eq!(input.resolve(None), Some(date(2024, 1, 15)));
        assert_eq!(input.time(), TimeOfDay::new(23, 30, 0).ok());
    }

    #[test]
    fn test_resolve_with_pattern() {
        let input = DateInput::from("15/01/2024");
        assert_eq!(input.resolve(Some("d/m/Y")), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_from_option() {
        assert!(DateInput::from(None::<&str>).is_empty());
        assert_eq!(DateInput::from(Some("2024-01-15")), DateInput::Text("2024-01-15".to_owned()));
    }

    #[test]
    fn test_deserialize() {
        let input: DateInput = serde_json::from_str(r#""2024-06-01""#).expect("deserialize text");
        assert_eq!(input, DateInput::Text("2024-06-01".to_owned()));

        let input: DateInput = serde_json::from_str("null").expect("deserialize null");
        assert!(input.is_empty());
    }
}
