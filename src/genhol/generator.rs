//! Built-in holiday-effect generator.
//!
//! Follows the usual genhol convention of X-13 tooling: every holiday opens a
//! window of days `[date + start, date + end]`, each day carrying `1 / len`
//! of the effect, and the effect of a period is the share of windows falling
//! into it. The series covers whole years, from the first to the last year any
//! window touches. Optional centering removes the calendar-month (or overall)
//! mean so the regressor does not absorb the seasonal level.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Center, EffectSeries, EffectSpec};
use crate::error::HolidayError;
use crate::genhol::HolidayEffectGenerator;

/// Largest distance, in days, a window edge may sit from its holiday.
pub const MAX_WINDOW_OFFSET: i64 = 366;

#[derive(Debug, Clone, Copy, Default)]
pub struct Genhol;

impl HolidayEffectGenerator for Genhol {
    fn generate(&self, dates: &[String], spec: &EffectSpec) -> Result<EffectSeries, HolidayError> {
        let frequency = spec.frequency;
        if !matches!(frequency, 4 | 12) {
            return Err(HolidayError::UnsupportedFrequency(frequency));
        }

        let (start, end) = (spec.start, spec.resolved_end());
        if start > end {
            return Err(HolidayError::InvalidWindow { start, end });
        }
        if start.unsigned_abs() > MAX_WINDOW_OFFSET as u64 || end.unsigned_abs() > MAX_WINDOW_OFFSET as u64 {
            return Err(HolidayError::WindowOutOfRange {
                start,
                end,
                limit: MAX_WINDOW_OFFSET,
            });
        }

        if dates.is_empty() {
            return Err(HolidayError::EmptyDateVector);
        }

        let holidays = dates
            .iter()
            .map(|s| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| HolidayError::InvalidEffectDate(s.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let weight = 1.0 / (end - start + 1) as f64;
        let mut shares: BTreeMap<(i32, u32), f64> = BTreeMap::new();

        for holiday in &holidays {
            for offset in start..=end {
                let day = holiday
                    .checked_add_signed(Duration::days(offset))
                    .ok_or_else(|| HolidayError::InvalidEffectDate(holiday.to_string()))?;
                *shares.entry((day.year(), period_of(day, frequency))).or_insert(0.0) += weight;
            }
        }

        // Non-empty: at least one holiday and one offset.
        let first_year = shares.keys().next().map(|(y, _)| *y).unwrap_or_default();
        let last_year = shares.keys().next_back().map(|(y, _)| *y).unwrap_or(first_year);

        let mut values = Vec::with_capacity(((last_year - first_year + 1) as usize) * frequency as usize);
        for year in first_year..=last_year {
            for period in 1..=frequency {
                values.push(shares.get(&(year, period)).copied().unwrap_or(0.0));
            }
        }

        match spec.center {
            Center::None => {}
            Center::Calendar => center_by_period(&mut values, frequency as usize),
            Center::Mean => center_by_mean(&mut values),
        }

        Ok(EffectSeries {
            start_year: first_year,
            start_period: 1,
            frequency,
            values,
        })
    }
}

fn period_of(day: NaiveDate, frequency: u32) -> u32 {
    match frequency {
        4 => day.month0() / 3 + 1,
        _ => day.month(),
    }
}

fn center_by_period(values: &mut [f64], frequency: usize) {
    let n_years = values.len() / frequency;
    if n_years == 0 {
        return;
    }
    for period in 0..frequency {
        let mean = (0..n_years).map(|y| values[y * frequency + period]).sum::<f64>() / n_years as f64;
        for y in 0..n_years {
            values[y * frequency + period] -= mean;
        }
    }
}

fn center_by_mean(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    for v in values.iter_mut() {
        *v -= mean;
    }
}
