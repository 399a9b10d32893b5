//! Per-year holiday summary.
//!
//! Turns the raw national-holiday calendar into one row per year holding the
//! number of holidays and the date of each tracked moving holiday. All three
//! operations are pure: they borrow their input and return fresh rows.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::domain::{DateOverrideMap, HolidaySummaryRow, RawHolidayRecord, TrackedHoliday, YearRange};

/// Summarize raw calendar rows by year.
///
/// - rows whose date cell is not a date are dropped silently
/// - years come out in ascending order
/// - `days_in_year` counts every valid row of the year, tracked or not
/// - for each tracked holiday the last matching row (input order) wins
pub fn summarize(records: &[RawHolidayRecord]) -> Vec<HolidaySummaryRow> {
    let mut by_year: BTreeMap<i32, HolidaySummaryRow> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records {
        let Some(date) = record.valid_date() else {
            dropped += 1;
            continue;
        };

        let row = by_year
            .entry(date.year())
            .or_insert_with(|| HolidaySummaryRow::empty(date.year()));
        row.days_in_year += 1;

        if let Some(holiday) = TrackedHoliday::from_label(&record.holiday_name) {
            row.set(holiday, Some(date));
        }
    }

    if dropped > 0 {
        debug!(dropped, "skipped calendar rows without a valid date");
    }

    by_year.into_values().collect()
}

/// Replace Carnival dates found in `overrides`; other columns are left alone.
pub fn apply_overrides(rows: &[HolidaySummaryRow], overrides: &DateOverrideMap) -> Vec<HolidaySummaryRow> {
    if overrides.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(replacement) = row.carnival.and_then(|d| overrides.get(&d)) {
                out.carnival = Some(replacement);
            }
            out
        })
        .collect()
}

/// Keep rows with `start_year <= year <= end_year`.
pub fn filter_by_year_range(rows: &[HolidaySummaryRow], start_year: i32, end_year: i32) -> Vec<HolidaySummaryRow> {
    let range = YearRange::new(start_year, end_year);
    rows.iter().filter(|row| range.contains(row.year)).cloned().collect()
}
