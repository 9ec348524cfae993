//! The engine facade.
//!
//! [`DatePicker`] owns the options snapshot, the selection and the viewed
//! month. Every mutator completes its dependent work (re-clamping, callbacks)
//! before returning `&mut Self`, so calls chain.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{
    CalendarDate, Clock, CurrentRange, DateInput, DateSpan, DayOfWeek, DisableFunction, DisabledReason,
    DisabledRuleSet, LocaleNames, MULTIPLE_VALUE_SEPARATOR, MonthGrid, Options, OptionsPatch, Position,
    RANGE_VALUE_SEPARATOR, Selection, SelectionMode, SelectionState, SystemClock, TimeOfDay, build_month,
    ClickOutcome, DECEMBER, JANUARY, format::format_localized, merge, parse_date, prelude::*,
};

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("DatePicker: Invalid element provided: {0}")]
    InvalidTarget(String),
}

/// Identifier of the input element the picker is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Into)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Looks up the element a selector names. Provided by the host view layer.
pub trait ResolveTarget {
    fn resolve(&self, selector: &str) -> Option<ElementId>;
}

impl<F> ResolveTarget for F
where
    F: Fn(&str) -> Option<ElementId>,
{
    fn resolve(&self, selector: &str) -> Option<ElementId> {
        self(selector)
    }
}

/// One entry of the month dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOption {
    pub month0:  u32,
    pub name:    String,
    /// `false` when the whole month lies outside the min/max bounds
    pub enabled: bool,
}

pub struct DatePicker {
    element:     ElementId,
    options:     Arc<Options>,
    selection:   SelectionState,
    view_year:   i32,
    view_month0: u32,
    time:        TimeOfDay,
    is_open:     bool,
    initialized: bool,
    clock:       Arc<dyn Clock>,
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("element", &self.element)
            .field("options", &self.options)
            .field("selection", &self.selection)
            .field("view_year", &self.view_year)
            .field("view_month0", &self.view_month0)
            .field("time", &self.time)
            .field("is_open", &self.is_open)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl DatePicker {
    /// Binds a picker to the element `target` resolves to.
    ///
    /// # Errors
    /// Returns `PickerError::InvalidTarget` when the resolver finds nothing.
    pub fn new<R>(resolver: &R, target: &str, patch: OptionsPatch) -> Result<Self, PickerError>
    where
        R: ResolveTarget + ?Sized,
    {
        Self::with_clock(resolver, target, patch, SystemClock)
    }

    /// Like [`DatePicker::new`], reading "today" from `clock`.
    ///
    /// # Errors
    /// Returns `PickerError::InvalidTarget` when the resolver finds nothing.
    pub fn with_clock<R>(
        resolver: &R,
        target: &str,
        patch: OptionsPatch,
        clock: impl Clock + 'static,
    ) -> Result<Self, PickerError>
    where
        R: ResolveTarget + ?Sized,
    {
        let element = resolver
            .resolve(target)
            .ok_or_else(|| PickerError::InvalidTarget(target.to_owned()))?;
        let options = merge(&Options::default(), patch);
        let today = clock.today();
        let selection = SelectionState::new(options.mode, options.confirm_range);

        debug!(%element, mode = %options.mode, "created date picker");
        Ok(Self {
            element,
            time: options.initial_time(),
            selection,
            view_year: today.year(),
            view_month0: today.month0(),
            is_open: false,
            initialized: false,
            clock: Arc::new(clock),
            options: Arc::new(options),
        })
    }

    // --- lifecycle ---

    /// Seeds the selection from the configured initial dates and positions
    /// the view. Calling it on an initialized picker does nothing.
    pub fn init(&mut self) -> &mut Self {
        if self.initialized {
            return self;
        }
        self.seed_selection();
        let bounds = self.options.bounds();
        let focus = self
            .options
            .default_date
            .or(self.options.start_date)
            .unwrap_or_else(|| self.clock.today());
        let focus = bounds.clamp(focus);
        self.view_year = focus.year();
        self.view_month0 = focus.month0();
        self.time = self.options.initial_time();
        self.is_open = self.options.inline;
        self.initialized = true;

        debug!(element = %self.element, year = self.view_year, month0 = self.view_month0, "initialized");
        if let Some(hook) = &self.options.callbacks.on_ready {
            hook();
        }
        self
    }

    /// Resets to the empty terminal state. Safe to call repeatedly.
    pub fn destroy(&mut self) -> &mut Self {
        self.selection.clear();
        self.is_open = false;
        self.initialized = false;
        debug!(element = %self.element, "destroyed");
        self
    }

    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn seed_selection(&mut self) {
        let options = Arc::clone(&self.options);
        match options.mode {
            SelectionMode::Range if options.start_date.is_some() || options.end_date.is_some() => {
                self.selection.set_range(options.start_date, options.end_date);
            },
            _ if options.default_date.is_some() => self.selection.set_date(options.default_date),
            _ => {},
        }
    }

    // --- accessors ---

    pub const fn element(&self) -> &ElementId {
        &self.element
    }

    /// The current options snapshot. Later setters replace it rather than
    /// editing it, so a held snapshot never changes underneath the caller.
    pub const fn options(&self) -> &Arc<Options> {
        &self.options
    }

    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    fn resolve(&self, input: &DateInput) -> Option<CalendarDate> {
        self.options.resolve(input)
    }

    /// Copy-on-write access to the options; holders of the old snapshot keep it.
    fn options_mut(&mut self) -> &mut Options {
        Arc::make_mut(&mut self.options)
    }

    fn rules_mut(&mut self) -> &mut DisabledRuleSet {
        &mut self.options_mut().rules
    }

    // --- selection ---

    /// Assigns the selection directly. Disabled dates are accepted; text that
    /// does not parse clears. A date-time input also sets the clock when time
    /// picking is on.
    pub fn set_date(&mut self, date: impl Into<DateInput>) -> &mut Self {
        let input = date.into();
        let resolved = self.resolve(&input);
        if let Some(time) = input.time().filter(|_| self.options.enable_time) {
            self.set_time(time);
        }
        self.commit(|selection| selection.set_date(resolved));
        if let Some(date) = resolved {
            self.view_year = date.year();
            self.view_month0 = date.month0();
        }
        self
    }

    pub fn get_date(&self) -> Selection {
        self.selection.value()
    }

    /// Assigns both range endpoints, swapping them when out of order.
    /// Ignored outside range mode.
    pub fn set_start_end_date(&mut self, start: impl Into<DateInput>, end: impl Into<DateInput>) -> &mut Self {
        if self.options.mode != SelectionMode::Range {
            debug!(mode = %self.options.mode, "set_start_end_date ignored outside range mode");
            return self;
        }
        let start = self.resolve(&start.into());
        let end = self.resolve(&end.into());
        self.commit(|selection| selection.set_range(start, end));
        if let Some(date) = start.or(end) {
            self.view_year = date.year();
            self.view_month0 = date.month0();
        }
        self
    }

    /// Pending and confirmed range; `None` outside range mode.
    pub fn get_current_range(&self) -> Option<CurrentRange> {
        self.selection.current_range()
    }

    /// Replaces a multiple selection. Unparseable entries are skipped.
    pub fn set_dates<I>(&mut self, dates: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let resolved: Vec<_> = dates.into_iter().filter_map(|d| self.resolve(&d.into())).collect();
        self.commit(|selection| selection.set_dates(resolved));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        let was_empty = self.selection.is_empty();
        self.selection.clear();
        if !was_empty {
            if let Some(hook) = &self.options.callbacks.on_clear {
                hook();
            }
            self.emit_change();
        }
        self
    }

    /// The grid-click path. Disabled or unparseable dates are ignored without
    /// touching state or firing callbacks.
    pub fn select_date(&mut self, date: impl Into<DateInput>) -> &mut Self {
        let Some(date) = self.resolve(&date.into()) else {
            debug!("ignoring click on unparseable date");
            return self;
        };
        if let Some(reason) = self.disabled_reason_for(date) {
            debug!(%date, %reason, "ignoring click on disabled date");
            return self;
        }

        let before = self.selection.value();
        let outcome = self.selection.click(date);
        trace!(%date, ?outcome, "click applied");

        if outcome != ClickOutcome::Deselected {
            if let Some(hook) = &self.options.callbacks.on_select {
                hook(date);
            }
        }
        if self.selection.value() != before {
            self.emit_change();
        }

        let completes = match outcome {
            ClickOutcome::Selected => self.options.mode == SelectionMode::Single,
            ClickOutcome::RangeCompleted => !self.selection.confirm_range(),
            ClickOutcome::Deselected | ClickOutcome::RangeAnchored => false,
        };
        if completes && self.options.close_on_select {
            self.close();
        }
        if (date.year(), date.month0()) != (self.view_year, self.view_month0) {
            self.show_month(i64::from(date.year()), i64::from(date.month0()));
        }
        self
    }

    pub fn is_date_selected(&self, date: impl Into<DateInput>) -> bool {
        self.resolve(&date.into())
            .is_some_and(|date| self.selection.is_selected(&date))
    }

    /// Applies a selection change and fires `on_change` if the visible value moved.
    fn commit(&mut self, change: impl FnOnce(&mut SelectionState)) {
        let before = self.selection.value();
        change(&mut self.selection);
        if self.selection.value() != before {
            self.emit_change();
        }
    }

    fn emit_change(&self) {
        if let Some(hook) = &self.options.callbacks.on_change {
            hook(&self.selection.value());
        }
    }

    // --- range confirmation ---

    /// Promotes the pending range to the visible selection.
    pub fn apply_range(&mut self) -> &mut Self {
        if self.selection.apply_range() {
            debug!(range = ?self.selection.displayed_range(), "range applied");
            self.emit_change();
            if self.options.close_on_select {
                self.close();
            }
        }
        self
    }

    /// Throws away the pending range and restores the confirmed one.
    pub fn cancel_range(&mut self) -> &mut Self {
        self.selection.cancel_range();
        self
    }

    pub fn enable_range_confirmation(&mut self, apply_text: Option<&str>, cancel_text: Option<&str>) -> &mut Self {
        let options = self.options_mut();
        options.confirm_range = true;
        if let Some(text) = apply_text {
            options.apply_button_text = text.to_owned();
        }
        if let Some(text) = cancel_text {
            options.cancel_button_text = text.to_owned();
        }
        self.selection.set_confirm_range(true);
        self
    }

    pub fn disable_range_confirmation(&mut self) -> &mut Self {
        self.options_mut().confirm_range = false;
        self.commit(|selection| selection.set_confirm_range(false));
        self
    }

    // --- bounds ---

    pub fn set_min_date(&mut self, date: impl Into<DateInput>) -> &mut Self {
        let min = self.resolve(&date.into());
        self.options_mut().min_date = min;
        self.reclamp();
        self
    }

    pub fn set_max_date(&mut self, date: impl Into<DateInput>) -> &mut Self {
        let max = self.resolve(&date.into());
        self.options_mut().max_date = max;
        self.reclamp();
        self
    }

    fn reclamp(&mut self) {
        let bounds = self.options.bounds();
        self.commit(|selection| {
            if selection.retain_within(&bounds) {
                debug!(min = ?bounds.min(), max = ?bounds.max(), "dropped selection outside new bounds");
            }
        });
    }

    // --- disabled dates ---

    fn resolve_all<I>(&self, dates: I) -> Vec<CalendarDate>
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        dates
            .into_iter()
            .filter_map(|date| {
                let input = date.into();
                let resolved = self.resolve(&input);
                if resolved.is_none() {
                    debug!(?input, "skipping unparseable date");
                }
                resolved
            })
            .collect()
    }

    fn resolve_span(&self, start: impl Into<DateInput>, end: impl Into<DateInput>) -> Option<DateSpan> {
        let start = self.resolve(&start.into())?;
        let end = self.resolve(&end.into())?;
        Some(DateSpan::new(start, end))
    }

    fn days_of_week(days: impl IntoIterator<Item = u8>) -> Vec<DayOfWeek> {
        days.into_iter()
            .filter_map(|day| match DayOfWeek::new(day) {
                Ok(day) => Some(day),
                Err(err) => {
                    debug!(%err, "skipping day of week");
                    None
                },
            })
            .collect()
    }

    pub fn add_disabled_dates<I>(&mut self, dates: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let dates = self.resolve_all(dates);
        self.rules_mut().add_dates(dates);
        self
    }

    pub fn remove_disabled_dates<I>(&mut self, dates: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let dates = self.resolve_all(dates);
        self.rules_mut().remove_dates(dates);
        self
    }

    pub fn clear_disabled_dates(&mut self) -> &mut Self {
        self.rules_mut().clear_dates();
        self
    }

    pub fn add_disabled_date_range(&mut self, start: impl Into<DateInput>, end: impl Into<DateInput>) -> &mut Self {
        match self.resolve_span(start, end) {
            Some(span) => {
                self.rules_mut().add_range(span);
            },
            None => debug!("skipping disabled range with an unparseable endpoint"),
        }
        self
    }

    pub fn remove_disabled_date_range(&mut self, start: impl Into<DateInput>, end: impl Into<DateInput>) -> &mut Self {
        if let Some(span) = self.resolve_span(start, end) {
            self.rules_mut().remove_range(span);
        }
        self
    }

    pub fn clear_disabled_date_ranges(&mut self) -> &mut Self {
        self.rules_mut().clear_ranges();
        self
    }

    /// Replaces the disabled weekdays (0 = Sunday). Values above 6 are skipped.
    pub fn set_disabled_days_of_week(&mut self, days: impl IntoIterator<Item = u8>) -> &mut Self {
        let days = Self::days_of_week(days);
        self.rules_mut().set_days_of_week(days);
        self
    }

    pub fn add_disabled_days_of_week(&mut self, days: impl IntoIterator<Item = u8>) -> &mut Self {
        let days = Self::days_of_week(days);
        self.rules_mut().add_days_of_week(days);
        self
    }

    pub fn remove_disabled_days_of_week(&mut self, days: impl IntoIterator<Item = u8>) -> &mut Self {
        let days = Self::days_of_week(days);
        self.rules_mut().remove_days_of_week(days);
        self
    }

    pub fn clear_disabled_days_of_week(&mut self) -> &mut Self {
        self.rules_mut().clear_days_of_week();
        self
    }

    pub fn set_disable_weekends(&mut self, disable: bool) -> &mut Self {
        self.rules_mut().set_disable_weekends(disable);
        self
    }

    pub fn set_block_past_dates(&mut self, block: bool) -> &mut Self {
        self.rules_mut().set_block_past(block);
        self
    }

    pub fn set_block_future_dates(&mut self, block: bool) -> &mut Self {
        self.rules_mut().set_block_future(block);
        self
    }

    /// Restricts selection to exactly these dates (still within bounds).
    pub fn set_enabled_dates<I>(&mut self, dates: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<DateInput>,
    {
        let dates = self.resolve_all(dates);
        self.rules_mut().set_enabled_dates(dates);
        self
    }

    pub fn clear_enabled_dates(&mut self) -> &mut Self {
        self.rules_mut().clear_enabled_dates();
        self
    }

    pub fn set_disable_function(&mut self, predicate: Option<DisableFunction>) -> &mut Self {
        self.rules_mut().set_predicate(predicate);
        self
    }

    /// Whether a click on `date` would be ignored. Text that does not parse
    /// is reported as not disabled.
    pub fn is_date_disabled(&self, date: impl Into<DateInput>) -> bool {
        self.disabled_reason(date).is_some()
    }

    /// The first rule that disables `date`.
    pub fn disabled_reason(&self, date: impl Into<DateInput>) -> Option<DisabledReason> {
        self.resolve(&date.into())
            .and_then(|date| self.disabled_reason_for(date))
    }

    fn disabled_reason_for(&self, date: CalendarDate) -> Option<DisabledReason> {
        self.options
            .rules
            .disabled_reason(date, &self.options.bounds(), self.clock.today())
    }

    // --- utilities ---

    /// Formats with the active locale names. Text that does not parse formats
    /// as an empty string.
    pub fn format_date(&self, date: impl Into<DateInput>, pattern: &str) -> String {
        let input = date.into();
        self.resolve(&input).map_or_else(String::new, |date| {
            let time = input.time().unwrap_or(TimeOfDay::MIDNIGHT);
            format_localized(date, time, pattern, &self.options.names)
        })
    }

    pub fn parse_date(&self, text: &str) -> Option<CalendarDate> {
        parse_date(text, self.options.pattern())
    }

    /// Calendar-day equality; `false` when either side does not parse.
    pub fn is_same_day(&self, a: impl Into<DateInput>, b: impl Into<DateInput>) -> bool {
        match (self.resolve(&a.into()), self.resolve(&b.into())) {
            (Some(a), Some(b)) => a.is_same_day(&b),
            _ => false,
        }
    }

    /// The text written back to the bound input.
    pub fn input_value(&self) -> String {
        let pattern = self.options.value_pattern();
        let format = |date: CalendarDate| format_localized(date, self.time, &pattern, &self.options.names);
        match self.selection.value() {
            Selection::Single(date) => date.map(format).unwrap_or_default(),
            Selection::Range(range) => match (range.start(), range.end()) {
                (Some(start), Some(end)) if start != end => {
                    format!("{}{RANGE_VALUE_SEPARATOR}{}", format(start), format(end))
                },
                (Some(date), _) | (None, Some(date)) => format(date),
                (None, None) => String::new(),
            },
            Selection::Multiple(dates) => dates
                .into_iter()
                .map(format)
                .collect::<Vec<_>>()
                .join(MULTIPLE_VALUE_SEPARATOR),
        }
    }

    // --- options ---

    /// Re-merges the options. Moving the bounds re-clamps the selection;
    /// switching mode resets it.
    pub fn update_options(&mut self, patch: OptionsPatch) -> &mut Self {
        let touches_bounds = patch.touches_bounds();
        let before = Arc::clone(&self.options);
        self.options = Arc::new(merge(&before, patch));

        if self.options.mode != before.mode {
            debug!(from = %before.mode, to = %self.options.mode, "mode changed, resetting selection");
            let was_empty = self.selection.is_empty();
            self.selection = SelectionState::new(self.options.mode, self.options.confirm_range);
            if !was_empty {
                self.emit_change();
            }
        } else if self.options.confirm_range != before.confirm_range {
            let confirm = self.options.confirm_range;
            self.commit(|selection| selection.set_confirm_range(confirm));
        }
        if self.options.enable_time != before.enable_time {
            self.time = self.options.initial_time();
        }
        if touches_bounds {
            self.reclamp();
        }
        if self.options.inline && !before.inline {
            self.is_open = true;
        }
        self
    }

    /// Switches the locale code. English names are built in; other locales
    /// need a dictionary from [`DatePicker::set_locale_names`].
    pub fn set_locale(&mut self, locale: &str) -> &mut Self {
        let options = self.options_mut();
        options.locale = locale.to_owned();
        if locale == crate::DEFAULT_LOCALE {
            options.names = Arc::new(LocaleNames::english());
        }
        self
    }

    pub fn set_locale_names(&mut self, names: LocaleNames) -> &mut Self {
        self.options_mut().names = Arc::new(names);
        self
    }

    pub fn weekday_headers(&self) -> Vec<&str> {
        self.options.names.weekday_headers(self.options.first_day_of_week)
    }

    // --- navigation ---

    pub const fn view_year(&self) -> i32 {
        self.view_year
    }

    /// 0-based month currently shown
    pub const fn view_month0(&self) -> u32 {
        self.view_month0
    }

    pub fn next_month(&mut self) -> &mut Self {
        self.show_month(i64::from(self.view_year), i64::from(self.view_month0) + 1)
    }

    pub fn prev_month(&mut self) -> &mut Self {
        self.show_month(i64::from(self.view_year), i64::from(self.view_month0) - 1)
    }

    /// Shows `month0` of the viewed year; values past 11 roll over.
    pub fn set_view_month(&mut self, month0: u32) -> &mut Self {
        self.show_month(i64::from(self.view_year), i64::from(month0))
    }

    pub fn set_view_year(&mut self, year: i32) -> &mut Self {
        self.show_month(i64::from(year), i64::from(self.view_month0))
    }

    pub fn go_to_date(&mut self, date: impl Into<DateInput>) -> &mut Self {
        match self.resolve(&date.into()) {
            Some(date) => self.show_month(i64::from(date.year()), i64::from(date.month0())),
            None => self,
        }
    }

    fn show_month(&mut self, year: i64, month0: i64) -> &mut Self {
        let Some(first) = CalendarDate::from_overflowing(year, month0, 1) else {
            debug!(year, month0, "month outside the supported date range");
            return self;
        };
        let (old_year, old_month0) = (self.view_year, self.view_month0);
        self.view_year = first.year();
        self.view_month0 = first.month0();

        if (old_year, old_month0) != (self.view_year, self.view_month0) {
            trace!(year = self.view_year, month0 = self.view_month0, "view moved");
            if let Some(hook) = &self.options.callbacks.on_month_change {
                hook(self.view_month0, self.view_year);
            }
        }
        if old_year != self.view_year {
            if let Some(hook) = &self.options.callbacks.on_year_change {
                hook(self.view_year);
            }
        }
        self
    }

    /// Builds the grid for the viewed month.
    pub fn render(&self) -> MonthGrid {
        build_month(
            self.view_year,
            self.view_month0,
            &self.options,
            &self.selection,
            self.clock.today(),
        )
    }

    // --- dropdowns ---

    pub fn enable_month_dropdown(&mut self) -> &mut Self {
        self.options_mut().enable_month_dropdown = true;
        self
    }

    pub fn disable_month_dropdown(&mut self) -> &mut Self {
        self.options_mut().enable_month_dropdown = false;
        self
    }

    pub fn enable_year_dropdown(&mut self) -> &mut Self {
        self.options_mut().enable_year_dropdown = true;
        self
    }

    pub fn disable_year_dropdown(&mut self) -> &mut Self {
        self.options_mut().enable_year_dropdown = false;
        self
    }

    pub fn set_year_range(&mut self, range: u16) -> &mut Self {
        self.options_mut().year_range = range;
        self
    }

    pub fn set_year_limits(&mut self, min_year: Option<i32>, max_year: Option<i32>) -> &mut Self {
        let options = self.options_mut();
        options.min_year = min_year;
        options.max_year = max_year;
        self
    }

    /// Months of the viewed year, flagged by whether any day is within bounds.
    pub fn month_options(&self) -> Vec<MonthOption> {
        let bounds = self.options.bounds();
        (JANUARY..=DECEMBER)
            .map(|month0| {
                let first = CalendarDate::first_of_month(self.view_year, month0);
                let last = CalendarDate::from_overflowing(i64::from(self.view_year), i64::from(month0) + 1, 0);
                let enabled = match (first, last) {
                    (Some(first), Some(last)) => {
                        bounds.max().is_none_or(|max| first <= max) && bounds.min().is_none_or(|min| last >= min)
                    },
                    _ => false,
                };
                MonthOption {
                    month0,
                    name: self.options.names.month(month0).to_owned(),
                    enabled,
                }
            })
            .collect()
    }

    /// Years offered by the year dropdown, ascending.
    ///
    /// Without explicit limits the list spans `year_range` years either side
    /// of the viewed year. Min/max dates narrow it further.
    pub fn year_options(&self) -> Vec<i32> {
        let span = i32::from(self.options.year_range);
        let mut first = self.options.min_year.unwrap_or(self.view_year - span);
        let mut last = self.options.max_year.unwrap_or(self.view_year + span);
        if let Some(min) = self.options.min_date {
            first = first.max(min.year());
        }
        if let Some(max) = self.options.max_date {
            last = last.min(max.year());
        }
        (first..=last).collect()
    }

    // --- visibility ---

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) -> &mut Self {
        if !self.is_open {
            self.is_open = true;
            if let Some(hook) = &self.options.callbacks.on_open {
                hook();
            }
        }
        self
    }

    /// Closes the popup. Inline pickers stay open.
    pub fn close(&mut self) -> &mut Self {
        if self.is_open && !self.options.inline {
            self.is_open = false;
            if let Some(hook) = &self.options.callbacks.on_close {
                hook();
            }
        }
        self
    }

    pub fn toggle(&mut self) -> &mut Self {
        if self.is_open { self.close() } else { self.open() }
    }

    // --- time ---

    pub const fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Sets the clock; ignored while time picking is off.
    pub fn set_time(&mut self, time: TimeOfDay) -> &mut Self {
        if !self.options.enable_time {
            debug!(%time, "time picking is off, ignoring time");
            return self;
        }
        if time != self.time {
            self.time = time;
            if let Some(hook) = &self.options.callbacks.on_time_change {
                hook(time);
            }
        }
        self
    }

    // --- placement ---

    pub fn set_position(&mut self, x: Option<f64>, y: Option<f64>) -> &mut Self {
        let placement = &mut self.options_mut().placement;
        placement.x = x;
        placement.y = y;
        self
    }

    pub fn set_position_x(&mut self, x: Option<f64>) -> &mut Self {
        self.options_mut().placement.x = x;
        self
    }

    pub fn set_position_y(&mut self, y: Option<f64>) -> &mut Self {
        self.options_mut().placement.y = y;
        self
    }

    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) -> &mut Self {
        let placement = &mut self.options_mut().placement;
        placement.offset_x = offset_x;
        placement.offset_y = offset_y;
        self
    }

    /// Back to automatic placement with no fixed coordinates or offsets.
    pub fn reset_position(&mut self) -> &mut Self {
        let placement = &mut self.options_mut().placement;
        placement.position = Position::Auto;
        placement.x = None;
        placement.y = None;
        placement.offset_x = 0.0;
        placement.offset_y = 0.0;
        self
    }

    pub fn set_append_to(&mut self, target: Option<&str>) -> &mut Self {
        self.options_mut().placement.append_to = target.map(str::to_owned);
        self
    }
}
