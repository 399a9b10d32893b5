//! Shared domain types.
//!
//! These types are kept small so they can be:
//!
//! - produced by either the ANBIMA download or a local file
//! - summarized and adjusted in-memory
//! - exported to CSV for the seasonal-adjustment tooling

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use clap::ValueEnum;

use crate::error::HolidayError;

/// A moving holiday tracked by the summary, with its ANBIMA label and output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackedHoliday {
    Carnival,
    Easter,
    Corpus,
}

impl TrackedHoliday {
    pub const ALL: [TrackedHoliday; 3] = [
        TrackedHoliday::Carnival,
        TrackedHoliday::Easter,
        TrackedHoliday::Corpus,
    ];

    /// Holiday name as written in the ANBIMA calendar.
    pub fn source_label(self) -> &'static str {
        match self {
            TrackedHoliday::Carnival => "Carnaval",
            TrackedHoliday::Easter => "Paixão de Cristo",
            TrackedHoliday::Corpus => "Corpus Christi",
        }
    }

    /// Column name in summaries and regressor tables.
    pub fn column_name(self) -> &'static str {
        match self {
            TrackedHoliday::Carnival => "Carnival",
            TrackedHoliday::Easter => "Easter",
            TrackedHoliday::Corpus => "Corpus",
        }
    }

    /// Match a calendar label against the tracked holidays.
    ///
    /// Besides the canonical UTF-8 spelling, the Latin-1-read-as-UTF-8 form
    /// `PaixÃ£o de Cristo` is accepted: it shows up when the spreadsheet is
    /// round-tripped through tools that guess the wrong encoding.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Carnaval" => Some(TrackedHoliday::Carnival),
            "Paixão de Cristo" | "PaixÃ£o de Cristo" => Some(TrackedHoliday::Easter),
            "Corpus Christi" => Some(TrackedHoliday::Corpus),
            _ => None,
        }
    }
}

/// Date cell of a raw calendar row.
///
/// The calendar carries header and footnote rows whose first column is not a
/// date; those are kept as `Other` and dropped at summarization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    Date(NaiveDate),
    Other(String),
}

impl RawDate {
    /// Interpret a text cell, falling back to `Other` when it is not a date.
    pub fn from_text(s: &str) -> Self {
        match parse_date_text(s) {
            Some(d) => RawDate::Date(d),
            None => RawDate::Other(s.to_string()),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RawDate::Date(d) => Some(*d),
            RawDate::Other(_) => None,
        }
    }
}

/// One row of the national holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHolidayRecord {
    pub date: RawDate,
    /// Day-of-week label (e.g. `segunda-feira`); carried along, never interpreted.
    pub weekday_label: String,
    pub holiday_name: String,
}

impl RawHolidayRecord {
    pub fn new(date: NaiveDate, weekday_label: impl Into<String>, holiday_name: impl Into<String>) -> Self {
        Self {
            date: RawDate::Date(date),
            weekday_label: weekday_label.into(),
            holiday_name: holiday_name.into(),
        }
    }

    /// Build a record from three text cells, parsing the date leniently.
    pub fn from_text(date: &str, weekday_label: &str, holiday_name: &str) -> Self {
        Self {
            date: RawDate::from_text(date),
            weekday_label: weekday_label.trim().to_string(),
            holiday_name: holiday_name.trim().to_string(),
        }
    }

    pub fn valid_date(&self) -> Option<NaiveDate> {
        self.date.as_date()
    }
}

/// Per-year summary of the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySummaryRow {
    pub year: i32,
    /// Number of calendar rows (of any holiday) falling in `year`.
    pub days_in_year: usize,
    pub carnival: Option<NaiveDate>,
    pub easter: Option<NaiveDate>,
    pub corpus: Option<NaiveDate>,
}

impl HolidaySummaryRow {
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            days_in_year: 0,
            carnival: None,
            easter: None,
            corpus: None,
        }
    }

    pub fn get(&self, holiday: TrackedHoliday) -> Option<NaiveDate> {
        match holiday {
            TrackedHoliday::Carnival => self.carnival,
            TrackedHoliday::Easter => self.easter,
            TrackedHoliday::Corpus => self.corpus,
        }
    }

    pub fn set(&mut self, holiday: TrackedHoliday, date: Option<NaiveDate>) {
        match holiday {
            TrackedHoliday::Carnival => self.carnival = date,
            TrackedHoliday::Easter => self.easter = date,
            TrackedHoliday::Corpus => self.corpus = date,
        }
    }
}

/// Manual date replacements for the Carnival column.
///
/// Keys and values must be disjoint so a replaced date never matches again;
/// this makes applying the map idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateOverrideMap {
    entries: BTreeMap<NaiveDate, NaiveDate>,
}

impl DateOverrideMap {
    pub fn new(entries: impl IntoIterator<Item = (NaiveDate, NaiveDate)>) -> Result<Self, HolidayError> {
        let entries: BTreeMap<NaiveDate, NaiveDate> = entries.into_iter().collect();
        if let Some(date) = entries.values().find(|v| entries.contains_key(*v)) {
            return Err(HolidayError::OverlappingOverride { date: *date });
        }
        Ok(Self { entries })
    }

    /// Known Carnival exceptions where the observed holiday moved from Tuesday
    /// to Ash Wednesday.
    pub fn carnival_defaults() -> Self {
        let pairs = [
            ((2003, 3, 4), (2003, 3, 5)),
            ((2014, 3, 4), (2014, 3, 5)),
            ((2022, 3, 1), (2022, 3, 2)),
            ((2025, 3, 4), (2025, 3, 5)),
        ];
        let entries = pairs
            .iter()
            .filter_map(|&((y0, m0, d0), (y1, m1, d1))| {
                Some((
                    NaiveDate::from_ymd_opt(y0, m0, d0)?,
                    NaiveDate::from_ymd_opt(y1, m1, d1)?,
                ))
            })
            .collect();
        Self { entries }
    }

    /// Merge `other` on top of `self`, re-checking disjointness.
    pub fn extended(&self, other: &DateOverrideMap) -> Result<Self, HolidayError> {
        let merged = self
            .entries
            .iter()
            .chain(other.entries.iter())
            .map(|(k, v)| (*k, *v));
        DateOverrideMap::new(merged)
    }

    pub fn get(&self, date: &NaiveDate) -> Option<NaiveDate> {
        self.entries.get(date).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &NaiveDate)> {
        self.entries.iter()
    }
}

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start_year: i32,
    pub end_year: i32,
}

impl YearRange {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self { start_year, end_year }
    }

    /// Only the year components of the two dates are used.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start.year(), end.year())
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }
}

/// How holiday-effect shares are centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Center {
    /// Raw shares of the window falling in each period.
    None,
    /// Subtract the mean of each period-of-year across years.
    Calendar,
    /// Subtract the overall mean of the series.
    Mean,
}

/// Parameters handed to a holiday-effect generator alongside the dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectSpec {
    /// First day of the window, relative to the holiday (negative = before).
    pub start: i64,
    /// Last day of the window; `None` means the holiday itself (`0`).
    pub end: Option<i64>,
    /// Periods per year (12 monthly, 4 quarterly).
    pub frequency: u32,
    pub center: Center,
}

impl EffectSpec {
    pub fn new(start: i64, end: i64, frequency: u32, center: Center) -> Self {
        Self {
            start,
            end: Some(end),
            frequency,
            center,
        }
    }

    pub fn resolved_end(&self) -> i64 {
        self.end.unwrap_or(0)
    }
}

/// A regular numeric series, one value per period.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSeries {
    pub start_year: i32,
    /// 1-based period of the first value (month for frequency 12).
    pub start_period: u32,
    pub frequency: u32,
    pub values: Vec<f64>,
}

impl EffectSeries {
    /// `(year, period)` of the value at `idx`.
    pub fn period_at(&self, idx: usize) -> (i32, u32) {
        let freq = self.frequency.max(1) as i64;
        let offset = (self.start_period as i64 - 1) + idx as i64;
        let year = self.start_year as i64 + offset.div_euclid(freq);
        let period = offset.rem_euclid(freq) + 1;
        (year as i32, period as u32)
    }

    /// `(year, period)` of the last value, if any.
    pub fn end_period(&self) -> Option<(i32, u32)> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.period_at(self.values.len() - 1))
    }
}

/// Parse a date cell written as text.
///
/// ISO (`YYYY-MM-DD`) is preferred, but the calendar and its CSV exports also
/// use Brazilian `DD/MM/YYYY`, and spreadsheet tools emit ISO date-times.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn labels_round_trip_including_misencoded_easter() {
        for h in TrackedHoliday::ALL {
            assert_eq!(TrackedHoliday::from_label(h.source_label()), Some(h));
        }
        assert_eq!(
            TrackedHoliday::from_label(" PaixÃ£o de Cristo "),
            Some(TrackedHoliday::Easter)
        );
        assert_eq!(TrackedHoliday::from_label("Tiradentes"), None);
    }

    #[test]
    fn raw_date_accepts_brazilian_and_iso_text() {
        assert_eq!(RawDate::from_text("25/02/2020"), RawDate::Date(d(2020, 2, 25)));
        assert_eq!(RawDate::from_text("2020-02-25 00:00:00"), RawDate::Date(d(2020, 2, 25)));
        assert_eq!(
            RawDate::from_text("Fonte: ANBIMA"),
            RawDate::Other("Fonte: ANBIMA".to_string())
        );
        assert_eq!(RawDate::from_text("31/02/2020").as_date(), None);
    }

    #[test]
    fn overrides_reject_chained_dates() {
        let err = DateOverrideMap::new([(d(2020, 2, 25), d(2020, 2, 26)), (d(2020, 2, 26), d(2020, 2, 27))])
            .unwrap_err();
        assert_eq!(err, HolidayError::OverlappingOverride { date: d(2020, 2, 26) });
    }

    #[test]
    fn carnival_defaults_are_disjoint() {
        let defaults = DateOverrideMap::carnival_defaults();
        assert_eq!(defaults.len(), 4);
        assert!(DateOverrideMap::new(defaults.iter().map(|(k, v)| (*k, *v))).is_ok());
        assert_eq!(defaults.get(&d(2022, 3, 1)), Some(d(2022, 3, 2)));
    }

    #[test]
    fn year_range_uses_year_components_only() {
        let range = YearRange::from_dates(d(2001, 1, 1), d(2027, 1, 1));
        assert!(range.contains(2001));
        assert!(range.contains(2027));
        assert!(!range.contains(2000));
        assert!(!range.contains(2028));
    }

    #[test]
    fn effect_series_period_arithmetic() {
        let series = EffectSeries {
            start_year: 2001,
            start_period: 11,
            frequency: 12,
            values: vec![0.0; 4],
        };
        assert_eq!(series.period_at(0), (2001, 11));
        assert_eq!(series.period_at(2), (2002, 1));
        assert_eq!(series.end_period(), Some((2002, 2)));
    }
}
