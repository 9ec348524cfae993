//! Token-based date formatting and parsing.
//!
//! Patterns use single-letter tokens (`Y-m-d`, `d/m/Y H:i`, `l, F j`).
//! Letters that are not tokens pass through unchanged and `\` escapes the
//! next character.
//!
//! Parsing goes through three stages and stops at the first hit:
//!
//! 1. a strict `YYYY-MM-DD` match, built from components as a local calendar
//!    day. Component overflow rolls forward (`2024-13-40` is `2025-02-09`).
//! 2. the caller's display pattern, if one is given.
//! 3. a permissive fallback over common shapes: RFC 3339 / RFC 2822
//!    timestamps (converted to the host's local date), ISO date-times without
//!    an offset, `YYYY/MM/DD`, month-first `M/D/YYYY`, and English month
//!    names. Ambiguous slash dates are always read month first.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::{
    CalendarDate, LocaleNames, TimeOfDay,
    locale::{ENGLISH_MONTHS, ENGLISH_MONTHS_SHORT, ENGLISH_WEEKDAYS, ENGLISH_WEEKDAYS_SHORT},
};

const ESCAPE: char = '\\';
const TWO_DIGIT_YEAR_BASE: i64 = 2000;

const FALLBACK_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const FALLBACK_DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%B %d %Y", "%d %B %Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    DayPadded,
    Day,
    WeekdayShort,
    Weekday,
    WeekdayNumber,
    MonthName,
    MonthShort,
    MonthPadded,
    Month,
    Year,
    YearShort,
    Hour24Padded,
    Hour24,
    Hour12Padded,
    Minute,
    Second,
    MeridiemUpper,
    MeridiemLower,
}

impl Field {
    const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'd' => Self::DayPadded,
            'j' => Self::Day,
            'D' => Self::WeekdayShort,
            'l' => Self::Weekday,
            'w' => Self::WeekdayNumber,
            'F' => Self::MonthName,
            'M' => Self::MonthShort,
            'm' => Self::MonthPadded,
            'n' => Self::Month,
            'Y' => Self::Year,
            'y' => Self::YearShort,
            'H' => Self::Hour24Padded,
            'G' => Self::Hour24,
            'h' => Self::Hour12Padded,
            'i' => Self::Minute,
            's' => Self::Second,
            'A' => Self::MeridiemUpper,
            'a' => Self::MeridiemLower,
            _ => return None,
        })
    }

    const fn is_time(self) -> bool {
        matches!(
            self,
            Self::Hour24Padded
                | Self::Hour24
                | Self::Hour12Padded
                | Self::Minute
                | Self::Second
                | Self::MeridiemUpper
                | Self::MeridiemLower
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    Field(Field),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            tokens.push(Token::Literal(chars.next().unwrap_or(ESCAPE)));
            continue;
        }
        tokens.push(Field::from_char(c).map_or(Token::Literal(c), Token::Field));
    }
    tokens
}

/// Whether `pattern` renders any clock field.
pub(crate) fn has_time_fields(pattern: &str) -> bool {
    tokenize(pattern)
        .into_iter()
        .any(|token| matches!(token, Token::Field(field) if field.is_time()))
}

/// Lazily renders a date through a tokenized pattern.
struct Formatted<'a> {
    date:   CalendarDate,
    time:   TimeOfDay,
    tokens: Vec<Token>,
    names:  &'a LocaleNames,
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (date, time, names) = (self.date, self.time, self.names);
        for token in &self.tokens {
            match *token {
                Token::Literal(c) => write!(f, "{c}")?,
                Token::Field(field) => match field {
                    Field::DayPadded => write!(f, "{:02}", date.day())?,
                    Field::Day => write!(f, "{}", date.day())?,
                    Field::WeekdayShort => f.write_str(names.weekday_short(date.weekday()))?,
                    Field::Weekday => f.write_str(names.weekday(date.weekday()))?,
                    Field::WeekdayNumber => write!(f, "{}", date.weekday())?,
                    Field::MonthName => f.write_str(names.month(date.month0()))?,
                    Field::MonthShort => f.write_str(names.month_short(date.month0()))?,
                    Field::MonthPadded => write!(f, "{:02}", date.month())?,
                    Field::Month => write!(f, "{}", date.month())?,
                    Field::Year => write!(f, "{:04}", date.year())?,
                    Field::YearShort => write!(f, "{:02}", date.year().rem_euclid(100))?,
                    Field::Hour24Padded => write!(f, "{:02}", time.hours())?,
                    Field::Hour24 => write!(f, "{}", time.hours())?,
                    Field::Hour12Padded => write!(f, "{:02}", time.hours12())?,
                    Field::Minute => write!(f, "{:02}", time.minutes())?,
                    Field::Second => write!(f, "{:02}", time.seconds())?,
                    Field::MeridiemUpper => f.write_str(if time.is_pm() { &names.pm } else { &names.am })?,
                    Field::MeridiemLower => {
                        let marker = if time.is_pm() { &names.pm } else { &names.am };
                        f.write_str(&marker.to_lowercase())?;
                    },
                },
            }
        }
        Ok(())
    }
}

/// Formats a date with English names; time tokens render as midnight.
pub fn format_date(date: CalendarDate, pattern: &str) -> String {
    format_localized(date, TimeOfDay::MIDNIGHT, pattern, &LocaleNames::english())
}

/// Formats a date and clock time with English names.
pub fn format_date_time(date: CalendarDate, time: TimeOfDay, pattern: &str) -> String {
    format_localized(date, time, pattern, &LocaleNames::english())
}

/// Formats a date and clock time using the given name dictionary.
pub fn format_localized(date: CalendarDate, time: TimeOfDay, pattern: &str, names: &LocaleNames) -> String {
    Formatted {
        date,
        time,
        tokens: tokenize(pattern),
        names,
    }
    .to_string()
}

/// Parses text into a calendar day. Never fails loudly: anything that does not
/// look like a date yields `None`.
pub fn parse_date(text: &str, pattern: Option<&str>) -> Option<CalendarDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_strict_iso(trimmed)
        .or_else(|| pattern.and_then(|p| parse_with_pattern(trimmed, p)))
        .or_else(|| parse_fallback(trimmed))
}

fn parse_strict_iso(text: &str) -> Option<CalendarDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = |part: &str| -> Option<i64> {
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    let year = digits(&text[0..4])?;
    let month = digits(&text[5..7])?;
    let day = digits(&text[8..10])?;
    CalendarDate::from_overflowing(year, month - 1, day)
}

/// Consumes input left to right while walking a tokenized pattern.
struct Cursor<'a> {
    rest: &'a str,
}

impl Cursor<'_> {
    fn number(&mut self, max_digits: usize) -> Option<i64> {
        let len = self
            .rest
            .bytes()
            .take(max_digits)
            .take_while(u8::is_ascii_digit)
            .count();
        if len == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(len);
        self.rest = rest;
        digits.parse().ok()
    }

    /// Matches the longest name (case-insensitive) and returns its index.
    fn name(&mut self, names: &[&str]) -> Option<usize> {
        let (index, len) = names
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                self.rest
                    .get(..name.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(name))
            })
            .map(|(index, name)| (index, name.len()))
            .max_by_key(|&(_, len)| len)?;
        self.rest = &self.rest[len..];
        Some(index)
    }

    fn literal(&mut self, c: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(c)?;
        Some(())
    }
}

fn parse_with_pattern(text: &str, pattern: &str) -> Option<CalendarDate> {
    let mut cursor = Cursor { rest: text };
    let mut year = None;
    let mut month = 1;
    let mut day = 1;

    for token in tokenize(pattern) {
        match token {
            Token::Literal(c) => cursor.literal(c)?,
            Token::Field(field) => match field {
                Field::Year => year = Some(cursor.number(4)?),
                Field::YearShort => year = Some(TWO_DIGIT_YEAR_BASE + cursor.number(2)?),
                Field::MonthPadded | Field::Month => month = cursor.number(2)?,
                Field::MonthName | Field::MonthShort => {
                    let index = cursor
                        .name(&ENGLISH_MONTHS)
                        .or_else(|| cursor.name(&ENGLISH_MONTHS_SHORT))?;
                    month = i64::try_from(index).ok()? + 1;
                },
                Field::DayPadded | Field::Day => day = cursor.number(2)?,
                Field::Weekday | Field::WeekdayShort => {
                    cursor
                        .name(&ENGLISH_WEEKDAYS)
                        .or_else(|| cursor.name(&ENGLISH_WEEKDAYS_SHORT))?;
                },
                Field::WeekdayNumber => {
                    cursor.number(1)?;
                },
                Field::Hour24Padded | Field::Hour24 | Field::Hour12Padded | Field::Minute | Field::Second => {
                    cursor.number(2)?;
                },
                Field::MeridiemUpper | Field::MeridiemLower => {
                    cursor.name(&["am", "pm"])?;
                },
            },
        }
    }

    if !cursor.rest.is_empty() {
        return None;
    }
    CalendarDate::from_overflowing(year?, month - 1, day)
}

fn parse_fallback(text: &str) -> Option<CalendarDate> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text).or_else(|_| DateTime::parse_from_rfc2822(text)) {
        return Some(instant.with_timezone(&Local).date_naive().into());
    }
    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .map(CalendarDate::from)
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .map(CalendarDate::from)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_format_default_pattern() {
        assert_eq!(format_date(date(2024, 1, 15), "Y-m-d"), "2024-01-15");
    }

    #[test]
    fn test_format_tokens() {
        struct TestCase {
            pattern:  &'static str,
            expected: &'static str,
        }

        // 2024-01-05 is a Friday
        let cases = [
            TestCase {
                pattern:  "d/m/Y",
                expected: "05/01/2024",
            },
            TestCase {
                pattern:  "j.n.y",
                expected: "5.1.24",
            },
            TestCase {
                pattern:  "l, F j, Y",
                expected: "Friday, January 5, 2024",
            },
            TestCase {
                pattern:  "D M d",
                expected: "Fri Jan 05",
            },
            TestCase {
                pattern:  "w",
                expected: "5",
            },
        ];

        for case in &cases {
            assert_eq!(format_date(date(2024, 1, 5), case.pattern), case.expected, "{}", case.pattern);
        }
    }

    #[test]
    fn test_format_unknown_tokens_pass_through() {
        assert_eq!(format_date(date(2024, 1, 15), "Y年m月d日"), "2024年01月15日");
        assert_eq!(format_date(date(2024, 1, 15), "[Y] (x)"), "[2024] (x)");
    }

    #[test]
    fn test_format_escape() {
        assert_eq!(format_date(date(2024, 1, 15), r"\Y\e\a\r: Y"), "Year: 2024");
        assert_eq!(format_date(date(2024, 1, 15), "Y\\"), "2024\\");
    }

    #[test]
    fn test_format_time_tokens() {
        let time = TimeOfDay::new(13, 5, 9).expect("valid time");
        assert_eq!(format_date_time(date(2024, 1, 15), time, "Y-m-d H:i:s"), "2024-01-15 13:05:09");
        assert_eq!(format_date_time(date(2024, 1, 15), time, "h:i A"), "01:05 PM");
        assert_eq!(format_date_time(date(2024, 1, 15), time, "G:i a"), "13:05 pm");
        assert_eq!(format_date(date(2024, 1, 15), "H:i"), "00:00");
    }

    #[test]
    fn test_format_localized_names() {
        let mut names = LocaleNames::english();
        names.months[0] = "janvier".to_owned();
        let text = format_localized(date(2024, 1, 15), TimeOfDay::MIDNIGHT, "j F Y", &names);
        assert_eq!(text, "15 janvier 2024");
    }

    #[test]
    fn test_parse_iso_is_local_calendar_day() {
        let parsed = parse_date("2024-01-15", None).expect("parse iso date");
        assert_eq!((parsed.year(), parsed.month0(), parsed.day()), (2024, 0, 15));
    }

    #[test]
    fn test_parse_overflow_rolls_forward() {
        let parsed = parse_date("2024-13-40", None).expect("overflowing date still parses");
        assert_eq!((parsed.year(), parsed.month0(), parsed.day()), (2025, 1, 9));
    }

    #[test]
    fn test_parse_invalid_returns_none() {
        assert_eq!(parse_date("invalid-date", None), None);
        assert_eq!(parse_date("", None), None);
        assert_eq!(parse_date("   ", None), None);
        assert_eq!(parse_date("2024-ab-01", None), None);
    }

    #[test]
    fn test_parse_fallback_shapes() {
        assert!(parse_date("2024-01-15T12:00:00Z", None).is_some());
        assert_eq!(parse_date("2024-01-15T08:30:00", None), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("1/15/2024", None), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("2024/01/15", None), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("2024-1-5", None), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("January 15, 2024", None), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("15 Jan 2024", None), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_with_pattern() {
        assert_eq!(parse_date("15/01/2024", Some("d/m/Y")), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("5.1.24", Some("j.n.y")), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("Friday, January 5, 2024", Some("l, F j, Y")), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-15 13:30", Some("Y-m-d H:i")), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("01:30 PM 2024-01-15", Some("h:i A Y-m-d")), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_pattern_mismatch_falls_back() {
        // d/m/Y cannot read an ISO string with time; the fallback can
        assert_eq!(parse_date("2024-01-15T00:00:00", Some("d/m/Y")), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("15/01/2024 trailing", Some("d/m/Y")), None);
    }

    #[test]
    fn test_round_trip_across_leap_years() {
        let mut current = date(2023, 12, 25);
        let end = date(2025, 1, 5);
        while current <= end {
            let text = format_date(current, "Y-m-d");
            assert_eq!(parse_date(&text, None).map(|d| format_date(d, "Y-m-d")), Some(text));
            current = current.add_days(1).expect("next day");
        }
    }
}
