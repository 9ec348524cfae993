//! Month views.
//!
//! A [`MonthGrid`] is a read-only projection of the options and selection at
//! the moment it was built. Nothing holds a reference back into the picker,
//! so grids can be rebuilt and thrown away on every render.

use crate::{CalendarDate, DAYS_PER_WEEK, DayOfWeek, Options, SelectionState, prelude::*};

/// Thursday, counted from Sunday = 0.
const THURSDAY: u8 = 4;

/// One day in a month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarCell {
    pub date:             CalendarDate,
    /// `false` for the leading and trailing days borrowed from adjacent months
    pub in_current_month: bool,
    pub is_today:         bool,
    pub is_selected:      bool,
    pub is_in_range:      bool,
    pub is_disabled:      bool,
}

/// One displayed row of seven cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week<'a> {
    /// ISO-8601 week number of the row's Thursday
    pub number: u32,
    pub days:   &'a [CalendarCell],
}

/// The cells of one month, padded to whole weeks.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct MonthGrid {
    year:              i32,
    month0:            u32,
    first_day_of_week: DayOfWeek,
    #[deref]
    cells:             Vec<CalendarCell>,
}

impl MonthGrid {
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// 0-based month shown by the grid
    pub const fn month0(&self) -> u32 {
        self.month0
    }

    pub const fn first_day_of_week(&self) -> DayOfWeek {
        self.first_day_of_week
    }

    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    pub fn rows(&self) -> usize {
        self.cells.len() / usize::from(DAYS_PER_WEEK)
    }

    /// The cell for `date`, if the grid shows it.
    pub fn cell(&self, date: &CalendarDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|cell| cell.date == *date)
    }

    pub fn weeks(&self) -> impl Iterator<Item = Week<'_>> {
        self.cells.chunks(usize::from(DAYS_PER_WEEK)).map(|days| {
            let number = days
                .iter()
                .find(|cell| cell.date.weekday().get() == THURSDAY)
                .or_else(|| days.first())
                .map_or(0, |cell| cell.date.iso_week());
            Week { number, days }
        })
    }
}

/// Lays out `month0` of `year` starting on the configured first day of week.
///
/// Months past 11 roll into the following year. The grid holds only as many
/// weeks as the month needs (four to six). A month outside chrono's date range
/// produces an empty grid.
pub fn build_month(
    year: i32,
    month0: u32,
    options: &Options,
    selection: &SelectionState,
    today: CalendarDate,
) -> MonthGrid {
    let first_day_of_week = options.first_day_of_week;
    let Some(first) = CalendarDate::from_overflowing(i64::from(year), i64::from(month0), 1) else {
        debug!(year, month0, "month outside the supported date range");
        return MonthGrid {
            year,
            month0,
            first_day_of_week,
            cells: Vec::new(),
        };
    };

    let (year, month0) = (first.year(), first.month0());
    let leading = u32::from(first.weekday().days_since(first_day_of_week));
    let week = u32::from(DAYS_PER_WEEK);
    let total = (leading + first.days_in_month()).div_ceil(week) * week;
    let bounds = options.bounds();

    let cells = (0..total)
        .filter_map(|offset| first.add_days(i64::from(offset) - i64::from(leading)))
        .map(|date| CalendarCell {
            date,
            in_current_month: date.year() == year && date.month0() == month0,
            is_today: date == today,
            is_selected: selection.is_selected(&date),
            is_in_range: selection.is_in_range(&date),
            is_disabled: options.rules.is_disabled(date, &bounds, today),
        })
        .collect();
    trace!(year, month0, "built month grid");

    MonthGrid {
        year,
        month0,
        first_day_of_week,
        cells,
    }
}
