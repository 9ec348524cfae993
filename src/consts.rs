/// Month index for January (months are 0-indexed in `CalendarDate::month0`)
pub const JANUARY: u32 = 0;
/// Month index for December
pub const DECEMBER: u32 = 11;

/// Number of months in a year
pub const MONTHS_PER_YEAR: u32 = 12;
/// Number of days in a week
pub const DAYS_PER_WEEK: u8 = 7;

/// Sunday, in the 0 = Sunday day-of-week numbering
pub const SUNDAY: u8 = 0;
/// Saturday, in the 0 = Sunday day-of-week numbering
pub const SATURDAY: u8 = 6;

/// Separator used when a `DateSpan` is written as text
pub const RANGE_SEPARATOR: char = '/';

/// Default display pattern (`2024-01-15`)
pub const DEFAULT_FORMAT: &str = "Y-m-d";
/// Default locale code
pub const DEFAULT_LOCALE: &str = "en";
/// Default theme name, passed through to the view layer
pub const DEFAULT_THEME: &str = "light";
/// Default number of years listed on either side of the view year
pub const DEFAULT_YEAR_RANGE: u16 = 10;
/// Default label for the range confirmation apply button
pub const DEFAULT_APPLY_TEXT: &str = "Apply";
/// Default label for the range confirmation cancel button
pub const DEFAULT_CANCEL_TEXT: &str = "Cancel";

/// Joins range endpoints in the bound input's text
pub const RANGE_VALUE_SEPARATOR: &str = " to ";
/// Joins dates of a multiple selection in the bound input's text
pub const MULTIPLE_VALUE_SEPARATOR: &str = ", ";
