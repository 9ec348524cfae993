use chrono::Local;

use crate::CalendarDate;

/// Source of "today" for past/future blocking and today flags.
///
/// The rule evaluator takes today as a parameter; the picker asks its clock
/// once per query so tests can pin the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> CalendarDate;
}

/// Reads the host's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        Local::now().date_naive().into()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
