//! Picker configuration.
//!
//! [`Options`] is the normalized snapshot the engine reads from. Every date-like
//! value in it has already been resolved to a [`CalendarDate`]. User input
//! arrives as an [`OptionsPatch`] and is folded in with [`merge`], which
//! produces a fresh snapshot instead of editing one in place.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    Bounds, CalendarDate, DEFAULT_APPLY_TEXT, DEFAULT_CANCEL_TEXT, DEFAULT_FORMAT, DEFAULT_LOCALE, DEFAULT_THEME,
    DEFAULT_YEAR_RANGE, DateInput, DateSpan, DayOfWeek, DisableFunction, DisabledRuleSet, LocaleNames, RangeError,
    Selection, SelectionMode, TimeOfDay, format::has_time_fields, prelude::*,
};

pub type Hook = Arc<dyn Fn() + Send + Sync>;
pub type ChangeHook = Arc<dyn Fn(&Selection) + Send + Sync>;
pub type SelectHook = Arc<dyn Fn(CalendarDate) + Send + Sync>;
/// Receives the 0-based month and the year
pub type MonthChangeHook = Arc<dyn Fn(u32, i32) + Send + Sync>;
pub type YearChangeHook = Arc<dyn Fn(i32) + Send + Sync>;
pub type TimeChangeHook = Arc<dyn Fn(TimeOfDay) + Send + Sync>;

/// Where the popup opens relative to its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    #[display(fmt = "auto")]
    Auto,
    #[display(fmt = "above")]
    Above,
    #[display(fmt = "below")]
    Below,
}

/// Inputs for an external positioning collaborator. Nothing here is computed
/// by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub position:  Position,
    /// Fixed coordinates; `None` lets the positioner decide
    #[serde(rename = "positionX")]
    pub x:         Option<f64>,
    #[serde(rename = "positionY")]
    pub y:         Option<f64>,
    pub offset_x:  f64,
    pub offset_y:  f64,
    /// Selector of the container the popup is mounted into
    pub append_to: Option<String>,
}

/// Observer hooks, each invoked synchronously after the state change it
/// reports has been committed.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_ready:        Option<Hook>,
    pub on_open:         Option<Hook>,
    pub on_close:        Option<Hook>,
    pub on_change:       Option<ChangeHook>,
    pub on_select:       Option<SelectHook>,
    pub on_clear:        Option<Hook>,
    pub on_month_change: Option<MonthChangeHook>,
    pub on_year_change:  Option<YearChangeHook>,
    pub on_time_change:  Option<TimeChangeHook>,
}

impl Callbacks {
    pub fn on_ready(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Arc::new(f));
        self
    }

    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }

    pub fn on_change(mut self, f: impl Fn(&Selection) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn on_select(mut self, f: impl Fn(CalendarDate) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(f));
        self
    }

    pub fn on_clear(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_clear = Some(Arc::new(f));
        self
    }

    pub fn on_month_change(mut self, f: impl Fn(u32, i32) + Send + Sync + 'static) -> Self {
        self.on_month_change = Some(Arc::new(f));
        self
    }

    pub fn on_year_change(mut self, f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.on_year_change = Some(Arc::new(f));
        self
    }

    pub fn on_time_change(mut self, f: impl Fn(TimeOfDay) + Send + Sync + 'static) -> Self {
        self.on_time_change = Some(Arc::new(f));
        self
    }

    /// Hooks set in `self` win; the rest come from `base`.
    fn overlay(self, base: &Self) -> Self {
        Self {
            on_ready:        self.on_ready.or_else(|| base.on_ready.clone()),
            on_open:         self.on_open.or_else(|| base.on_open.clone()),
            on_close:        self.on_close.or_else(|| base.on_close.clone()),
            on_change:       self.on_change.or_else(|| base.on_change.clone()),
            on_select:       self.on_select.or_else(|| base.on_select.clone()),
            on_clear:        self.on_clear.or_else(|| base.on_clear.clone()),
            on_month_change: self.on_month_change.or_else(|| base.on_month_change.clone()),
            on_year_change:  self.on_year_change.or_else(|| base.on_year_change.clone()),
            on_time_change:  self.on_time_change.or_else(|| base.on_time_change.clone()),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_ready", &self.on_ready.is_some())
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("on_clear", &self.on_clear.is_some())
            .field("on_month_change", &self.on_month_change.is_some())
            .field("on_year_change", &self.on_year_change.is_some())
            .field("on_time_change", &self.on_time_change.is_some())
            .finish()
    }
}

/// Normalized configuration snapshot.
#[derive(Debug, Clone)]
pub struct Options {
    pub mode:                  SelectionMode,
    /// Display pattern, also tried when parsing text dates
    pub format:                String,
    pub locale:                String,
    pub theme:                 String,
    pub names:                 Arc<LocaleNames>,
    pub start_date:            Option<CalendarDate>,
    pub end_date:              Option<CalendarDate>,
    pub min_date:              Option<CalendarDate>,
    pub max_date:              Option<CalendarDate>,
    pub default_date:          Option<CalendarDate>,
    /// Clock time carried by a date-time `defaultDate`
    pub default_time:          Option<TimeOfDay>,
    pub first_day_of_week:     DayOfWeek,
    pub show_week_numbers:     bool,
    /// Inline pickers are always open
    pub inline:                bool,
    pub close_on_select:       bool,
    pub enable_time:           bool,
    pub enable_seconds:        bool,
    pub time_24hr:             bool,
    pub enable_month_dropdown: bool,
    pub enable_year_dropdown:  bool,
    /// Years listed on either side of the viewed year when no limits are set
    pub year_range:            u16,
    pub min_year:              Option<i32>,
    pub max_year:              Option<i32>,
    pub confirm_range:         bool,
    pub apply_button_text:     String,
    pub cancel_button_text:    String,
    pub rules:                 DisabledRuleSet,
    pub placement:             Placement,
    pub callbacks:             Callbacks,
}

impl Options {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min_date, self.max_date)
    }

    /// Pattern handed to the parser for text input
    pub fn pattern(&self) -> Option<&str> {
        Some(self.format.as_str())
    }

    /// Clock pattern for the bound input; `None` unless time picking is on.
    pub const fn time_pattern(&self) -> Option<&'static str> {
        if !self.enable_time {
            return None;
        }
        Some(match (self.time_24hr, self.enable_seconds) {
            (true, false) => "H:i",
            (true, true) => "H:i:s",
            (false, false) => "h:i A",
            (false, true) => "h:i:s A",
        })
    }

    /// Pattern for the bound input's text. The clock part is appended unless
    /// `format` already renders time fields.
    pub fn value_pattern(&self) -> Cow<'_, str> {
        match self.time_pattern() {
            Some(time) if !has_time_fields(&self.format) => Cow::Owned(format!("{} {time}", self.format)),
            _ => Cow::Borrowed(&self.format),
        }
    }

    /// Time of day a picker starts with. Midnight unless time picking is on.
    pub fn initial_time(&self) -> TimeOfDay {
        self.default_time
            .filter(|_| self.enable_time)
            .unwrap_or(TimeOfDay::MIDNIGHT)
    }

    /// Resolves a date-like value with this snapshot's pattern.
    pub fn resolve(&self, input: &DateInput) -> Option<CalendarDate> {
        input.resolve(self.pattern())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode:                  SelectionMode::default(),
            format:                DEFAULT_FORMAT.to_owned(),
            locale:                DEFAULT_LOCALE.to_owned(),
            theme:                 DEFAULT_THEME.to_owned(),
            names:                 Arc::new(LocaleNames::english()),
            start_date:            None,
            end_date:              None,
            min_date:              None,
            max_date:              None,
            default_date:          None,
            default_time:          None,
            first_day_of_week:     DayOfWeek::SUNDAY,
            show_week_numbers:     false,
            inline:                false,
            close_on_select:       true,
            enable_time:           false,
            enable_seconds:        false,
            time_24hr:             false,
            enable_month_dropdown: false,
            enable_year_dropdown:  false,
            year_range:            DEFAULT_YEAR_RANGE,
            min_year:              None,
            max_year:              None,
            confirm_range:         false,
            apply_button_text:     DEFAULT_APPLY_TEXT.to_owned(),
            cancel_button_text:    DEFAULT_CANCEL_TEXT.to_owned(),
            rules:                 DisabledRuleSet::default(),
            placement:             Placement::default(),
            callbacks:             Callbacks::default(),
        }
    }
}

/// A disabled range as configured, before its endpoints are resolved.
///
/// Accepts either a `{ "start", "end" }` object or `start/end` text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RangeInput {
    /// `2024-02-01/2024-02-05`; each side is read as ISO or a common fallback
    /// shape, never with the display pattern since it may contain `/`
    Text(String),
    Bounds { start: DateInput, end: DateInput },
}

impl RangeInput {
    pub fn new(start: impl Into<DateInput>, end: impl Into<DateInput>) -> Self {
        Self::Bounds {
            start: start.into(),
            end:   end.into(),
        }
    }

    fn resolve(&self, pattern: Option<&str>) -> Option<DateSpan> {
        match self {
            Self::Text(text) => text
                .parse()
                .map_err(|err: RangeError| debug!(%err, "unparseable disabled range text"))
                .ok(),
            Self::Bounds { start, end } => Some(DateSpan::new(start.resolve(pattern)?, end.resolve(pattern)?)),
        }
    }
}

impl From<&str> for RangeInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Partial user configuration.
///
/// `None` leaves the current value alone. For nullable options an explicit
/// JSON `null` deserializes to `Some` of an empty value and clears it.
/// Collections are added to what is already configured.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsPatch {
    pub mode:                  Option<SelectionMode>,
    pub format:                Option<String>,
    pub locale:                Option<String>,
    pub locale_names:          Option<LocaleNames>,
    pub theme:                 Option<String>,
    #[serde(deserialize_with = "present")]
    pub start_date:            Option<DateInput>,
    #[serde(deserialize_with = "present")]
    pub end_date:              Option<DateInput>,
    #[serde(deserialize_with = "present")]
    pub min_date:              Option<DateInput>,
    #[serde(deserialize_with = "present")]
    pub max_date:              Option<DateInput>,
    #[serde(deserialize_with = "present")]
    pub default_date:          Option<DateInput>,
    pub first_day_of_week:     Option<DayOfWeek>,
    #[serde(alias = "weekNumbers")]
    pub show_week_numbers:     Option<bool>,
    pub inline:                Option<bool>,
    pub close_on_select:       Option<bool>,
    pub enable_time:           Option<bool>,
    pub enable_seconds:        Option<bool>,
    #[serde(rename = "time_24hr")]
    pub time_24hr:             Option<bool>,
    pub enable_month_dropdown: Option<bool>,
    pub enable_year_dropdown:  Option<bool>,
    pub year_range:            Option<u16>,
    #[serde(deserialize_with = "present")]
    pub min_year:              Option<Option<i32>>,
    #[serde(deserialize_with = "present")]
    pub max_year:              Option<Option<i32>>,
    pub confirm_range:         Option<bool>,
    pub apply_button_text:     Option<String>,
    pub cancel_button_text:    Option<String>,
    pub disabled_dates:        Vec<DateInput>,
    pub disabled_days_of_week: Vec<DayOfWeek>,
    pub disabled_date_ranges:  Vec<RangeInput>,
    pub enabled_dates:         Vec<DateInput>,
    pub disable_weekends:      Option<bool>,
    pub block_past_dates:      Option<bool>,
    pub block_future_dates:    Option<bool>,
    /// `Some(None)` removes the current predicate
    #[serde(skip)]
    pub disable_function:      Option<Option<DisableFunction>>,
    pub position:              Option<Position>,
    #[serde(deserialize_with = "present")]
    pub position_x:            Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    pub position_y:            Option<Option<f64>>,
    pub offset_x:              Option<f64>,
    pub offset_y:              Option<f64>,
    #[serde(deserialize_with = "present")]
    pub append_to:             Option<Option<String>>,
    #[serde(skip)]
    pub callbacks:             Callbacks,
}

/// Maps any present value, `null` included, to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl OptionsPatch {
    /// Whether applying the patch could move the min/max bounds
    pub const fn touches_bounds(&self) -> bool {
        self.min_date.is_some() || self.max_date.is_some()
    }
}

impl fmt::Debug for OptionsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsPatch")
            .field("mode", &self.mode)
            .field("format", &self.format)
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .field("disabled_dates", &self.disabled_dates.len())
            .field("disabled_date_ranges", &self.disabled_date_ranges.len())
            .field("enabled_dates", &self.enabled_dates.len())
            .field("confirm_range", &self.confirm_range)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Resolves every date in `inputs`, logging and skipping the ones that do not parse.
fn resolve_all<'a>(
    inputs: &'a [DateInput],
    pattern: Option<&'a str>,
    option: &'static str,
) -> impl Iterator<Item = CalendarDate> + 'a {
    inputs.iter().filter_map(move |input| {
        let resolved = input.resolve(pattern);
        if resolved.is_none() {
            debug!(option, ?input, "ignoring unparseable date");
        }
        resolved
    })
}

/// Folds `patch` over `defaults`.
///
/// Scalars in the patch overwrite. Disabled dates, ranges, days of week and
/// enabled dates are unioned with the existing rule set. Date-like values are
/// resolved with the format in effect after the patch is applied.
pub fn merge(defaults: &Options, patch: OptionsPatch) -> Options {
    let OptionsPatch {
        mode,
        format,
        locale,
        locale_names,
        theme,
        start_date,
        end_date,
        min_date,
        max_date,
        default_date,
        first_day_of_week,
        show_week_numbers,
        inline,
        close_on_select,
        enable_time,
        enable_seconds,
        time_24hr,
        enable_month_dropdown,
        enable_year_dropdown,
        year_range,
        min_year,
        max_year,
        confirm_range,
        apply_button_text,
        cancel_button_text,
        disabled_dates,
        disabled_days_of_week,
        disabled_date_ranges,
        enabled_dates,
        disable_weekends,
        block_past_dates,
        block_future_dates,
        disable_function,
        position,
        position_x,
        position_y,
        offset_x,
        offset_y,
        append_to,
        callbacks,
    } = patch;

    let mut options = defaults.clone();

    assign(&mut options.mode, mode);
    assign(&mut options.format, format);
    assign(&mut options.locale, locale);
    assign(&mut options.names, locale_names.map(Arc::new));
    assign(&mut options.theme, theme);
    assign(&mut options.first_day_of_week, first_day_of_week);
    assign(&mut options.show_week_numbers, show_week_numbers);
    assign(&mut options.inline, inline);
    assign(&mut options.close_on_select, close_on_select);
    assign(&mut options.enable_time, enable_time);
    assign(&mut options.enable_seconds, enable_seconds);
    assign(&mut options.time_24hr, time_24hr);
    assign(&mut options.enable_month_dropdown, enable_month_dropdown);
    assign(&mut options.enable_year_dropdown, enable_year_dropdown);
    assign(&mut options.year_range, year_range);
    assign(&mut options.min_year, min_year);
    assign(&mut options.max_year, max_year);
    assign(&mut options.confirm_range, confirm_range);
    assign(&mut options.apply_button_text, apply_button_text);
    assign(&mut options.cancel_button_text, cancel_button_text);

    assign(&mut options.placement.position, position);
    assign(&mut options.placement.x, position_x);
    assign(&mut options.placement.y, position_y);
    assign(&mut options.placement.offset_x, offset_x);
    assign(&mut options.placement.offset_y, offset_y);
    assign(&mut options.placement.append_to, append_to);

    let pattern = options.format.clone();
    let pattern = Some(pattern.as_str());

    if let Some(input) = start_date {
        options.start_date = input.resolve(pattern);
    }
    if let Some(input) = end_date {
        options.end_date = input.resolve(pattern);
    }
    if let Some(input) = min_date {
        options.min_date = input.resolve(pattern);
    }
    if let Some(input) = max_date {
        options.max_date = input.resolve(pattern);
    }
    if let Some(input) = default_date {
        options.default_date = input.resolve(pattern);
        options.default_time = input.time();
    }

    let rules = &mut options.rules;
    rules
        .add_dates(resolve_all(&disabled_dates, pattern, "disabledDates"))
        .add_days_of_week(disabled_days_of_week)
        .add_enabled_dates(resolve_all(&enabled_dates, pattern, "enabledDates"));
    for range in &disabled_date_ranges {
        match range.resolve(pattern) {
            Some(span) => {
                rules.add_range(span);
            },
            None => debug!(?range, "ignoring unparseable disabled date range"),
        }
    }
    if let Some(disable) = disable_weekends {
        rules.set_disable_weekends(disable);
    }
    if let Some(block) = block_past_dates {
        rules.set_block_past(block);
    }
    if let Some(block) = block_future_dates {
        rules.set_block_future(block);
    }
    if let Some(predicate) = disable_function {
        rules.set_predicate(predicate);
    }

    options.callbacks = callbacks.overlay(&defaults.callbacks);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn patch_from_json(json: &str) -> OptionsPatch {
        serde_json::from_str(json).expect("valid options JSON")
    }

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.mode, SelectionMode::Single);
        assert_eq!(options.format, "Y-m-d");
        assert_eq!(options.locale, "en");
        assert_eq!(options.theme, "light");
        assert_eq!(options.first_day_of_week, DayOfWeek::SUNDAY);
        assert_eq!(options.year_range, 10);
        assert!(options.close_on_select);
        assert!(!options.confirm_range);
        assert_eq!(options.apply_button_text, "Apply");
        assert_eq!(options.cancel_button_text, "Cancel");
        assert_eq!(options.bounds(), Bounds::UNBOUNDED);
    }

    #[test]
    fn test_scalars_overwrite_and_unset_keep_defaults() {
        let options = merge(
            &Options::default(),
            OptionsPatch {
                mode: Some(SelectionMode::Range),
                theme: Some("dark".to_owned()),
                ..OptionsPatch::default()
            },
        );
        assert_eq!(options.mode, SelectionMode::Range);
        assert_eq!(options.theme, "dark");
        assert_eq!(options.format, "Y-m-d");
        assert_eq!(options.locale, "en");
    }

    #[test]
    fn test_collections_are_unioned() {
        let first = merge(
            &Options::default(),
            OptionsPatch {
                disabled_dates: vec!["2024-01-15".into()],
                disabled_days_of_week: vec![DayOfWeek::SUNDAY],
                ..OptionsPatch::default()
            },
        );
        let second = merge(
            &first,
            OptionsPatch {
                disabled_dates: vec!["2024-01-16".into(), "2024-01-15".into()],
                disabled_days_of_week: vec![DayOfWeek::SATURDAY],
                ..OptionsPatch::default()
            },
        );

        let dates: Vec<_> = second.rules.dates().iter().copied().collect();
        assert_eq!(dates, vec![date(2024, 1, 15), date(2024, 1, 16)]);
        assert_eq!(second.rules.days_of_week().len(), 2);
        assert_eq!(first.rules.dates().len(), 1);
    }

    #[test]
    fn test_dates_resolved_with_merged_format() {
        let options = merge(
            &Options::default(),
            OptionsPatch {
                format: Some("d/m/Y".to_owned()),
                min_date: Some("05/02/2024".into()),
                max_date: Some("2024-12-31".into()),
                disabled_date_ranges: vec![RangeInput::new("10/03/2024", "01/03/2024")],
                ..OptionsPatch::default()
            },
        );
        assert_eq!(options.min_date, Some(date(2024, 2, 5)));
        assert_eq!(options.max_date, Some(date(2024, 12, 31)));

        let span = options.rules.ranges().first().copied().expect("range resolved");
        assert_eq!(span.start(), date(2024, 3, 1));
        assert_eq!(span.end(), date(2024, 3, 10));
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let options = merge(
            &Options::default(),
            OptionsPatch {
                min_date: Some("not a date".into()),
                disabled_dates: vec!["nope".into(), "2024-01-15".into()],
                disabled_date_ranges: vec![RangeInput::new("2024-01-01", "bad"), "2024-01-01/bad".into()],
                ..OptionsPatch::default()
            },
        );
        assert_eq!(options.min_date, None);
        assert_eq!(options.rules.dates().len(), 1);
        assert!(options.rules.ranges().is_empty());
    }

    #[test]
    fn test_patch_from_json() {
        let patch = patch_from_json(
            r#"{
                "mode": "range",
                "minDate": "2024-01-01",
                "firstDayOfWeek": 1,
                "weekNumbers": true,
                "time_24hr": true,
                "disabledDates": ["2024-01-15"],
                "disabledDateRanges": [
                    { "start": "2024-02-01", "end": "2024-02-05" },
                    "2024-03-10 / 2024-03-08"
                ],
                "disabledDaysOfWeek": [0, 6],
                "blockPastDates": true,
                "confirmRange": true,
                "applyButtonText": "OK",
                "position": "above",
                "offsetY": 4.5
            }"#,
        );
        let options = merge(&Options::default(), patch);

        assert_eq!(options.mode, SelectionMode::Range);
        assert_eq!(options.min_date, Some(date(2024, 1, 1)));
        assert_eq!(options.first_day_of_week.get(), 1);
        assert!(options.show_week_numbers);
        assert!(options.time_24hr);
        assert!(options.rules.dates().contains(&date(2024, 1, 15)));
        let ranges: Vec<_> = options.rules.ranges().iter().map(ToString::to_string).collect();
        assert_eq!(ranges, vec!["2024-02-01/2024-02-05", "2024-03-08/2024-03-10"]);
        assert_eq!(options.rules.days_of_week().len(), 2);
        assert!(options.rules.block_past());
        assert!(options.confirm_range);
        assert_eq!(options.apply_button_text, "OK");
        assert_eq!(options.cancel_button_text, "Cancel");
        assert_eq!(options.placement.position, Position::Above);
        assert!((options.placement.offset_y - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_null_clears_and_absent_keeps() {
        let base = merge(
            &Options::default(),
            OptionsPatch {
                min_date: Some("2024-01-01".into()),
                max_date: Some("2024-12-31".into()),
                min_year: Some(Some(2000)),
                ..OptionsPatch::default()
            },
        );

        let options = merge(&base, patch_from_json(r#"{ "minDate": null, "minYear": null }"#));
        assert_eq!(options.min_date, None);
        assert_eq!(options.min_year, None);
        assert_eq!(options.max_date, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(serde_json::from_str::<OptionsPatch>(r#"{ "mode": "week" }"#).is_err());
        assert!(serde_json::from_str::<OptionsPatch>(r#"{ "disabledDaysOfWeek": [7] }"#).is_err());
    }

    #[test]
    fn test_touches_bounds() {
        assert!(!OptionsPatch::default().touches_bounds());
        assert!(patch_from_json(r#"{ "maxDate": null }"#).touches_bounds());
    }

    #[test]
    fn test_callbacks_overlay() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let base = merge(
            &Options::default(),
            OptionsPatch {
                callbacks: Callbacks::default().on_clear(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
                ..OptionsPatch::default()
            },
        );
        let options = merge(
            &base,
            OptionsPatch {
                callbacks: Callbacks::default().on_open(|| {}),
                ..OptionsPatch::default()
            },
        );

        assert!(options.callbacks.on_open.is_some());
        let on_clear = options.callbacks.on_clear.expect("inherited hook");
        on_clear();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_date_time_kept() {
        let datetime = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .expect("valid datetime");
        let options = merge(
            &Options::default(),
            OptionsPatch {
                default_date: Some(datetime.into()),
                ..OptionsPatch::default()
            },
        );
        assert_eq!(options.default_date, Some(date(2024, 1, 15)));
        assert_eq!(options.default_time, TimeOfDay::new(9, 30, 0).ok());
    }
}
