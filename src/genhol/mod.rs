//! Holiday-effect generation boundary.
//!
//! The summary's date columns are turned into regressors in two steps:
//!
//! 1. `effect_dates` renders one column as `YYYY-MM-DD` strings (the format the
//!    statistical tooling expects) and refuses empty input
//! 2. a `HolidayEffectGenerator` maps those dates to one value per period
//!
//! `Genhol` is the built-in generator; anything else (a bridge to an external
//! statistical runtime, a test fake) can be plugged in through the trait.

use crate::domain::{EffectSeries, EffectSpec, HolidaySummaryRow, TrackedHoliday};
use crate::error::HolidayError;

pub mod generator;
pub mod regressors;

pub use generator::{Genhol, MAX_WINDOW_OFFSET};
pub use regressors::{CARNIVAL_WINDOW, CORPUS_WINDOW, EffectRequest, RegressorRow, RegressorTable, build_regressors};

/// Produces a per-period holiday-effect series from holiday dates.
pub trait HolidayEffectGenerator {
    fn generate(&self, dates: &[String], spec: &EffectSpec) -> Result<EffectSeries, HolidayError>;
}

/// Non-absent dates of one summary column as `YYYY-MM-DD`, in row order.
pub fn effect_dates(rows: &[HolidaySummaryRow], holiday: TrackedHoliday) -> Result<Vec<String>, HolidayError> {
    let dates: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get(holiday))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    if dates.is_empty() {
        return Err(HolidayError::EmptyEffectInput {
            column: holiday.column_name(),
        });
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn effect_dates_skip_absent_values() {
        let rows = vec![
            HolidaySummaryRow {
                corpus: NaiveDate::from_ymd_opt(2020, 6, 11),
                ..HolidaySummaryRow::empty(2020)
            },
            HolidaySummaryRow::empty(2021),
            HolidaySummaryRow {
                corpus: NaiveDate::from_ymd_opt(2022, 6, 16),
                ..HolidaySummaryRow::empty(2022)
            },
        ];

        let dates = effect_dates(&rows, TrackedHoliday::Corpus).unwrap();
        assert_eq!(dates, vec!["2020-06-11".to_string(), "2022-06-16".to_string()]);
    }

    #[test]
    fn effect_dates_fail_on_empty_column() {
        let rows = vec![HolidaySummaryRow::empty(2020), HolidaySummaryRow::empty(2021)];
        let err = effect_dates(&rows, TrackedHoliday::Easter).unwrap_err();
        assert_eq!(err, HolidayError::EmptyEffectInput { column: "Easter" });
        assert_eq!(err.to_string(), "The column Easter contains no valid dates.");

        assert!(effect_dates(&[], TrackedHoliday::Carnival).is_err());
    }
}
