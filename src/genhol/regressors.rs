//! Combine per-holiday effect series into one regressor table.

use crate::domain::{Center, EffectSeries, EffectSpec, HolidaySummaryRow, TrackedHoliday};
use crate::error::HolidayError;
use crate::genhol::{HolidayEffectGenerator, effect_dates};

/// Which summary column to turn into a regressor, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectRequest {
    pub holiday: TrackedHoliday,
    pub spec: EffectSpec,
}

/// Carnival effect over the four days before the holiday.
pub const CARNIVAL_WINDOW: (i64, i64) = (-4, -1);

/// Corpus Christi effect over the three days after the holiday (the "bridge" Friday and weekend).
pub const CORPUS_WINDOW: (i64, i64) = (1, 3);

impl EffectRequest {
    pub fn new(holiday: TrackedHoliday, (start, end): (i64, i64), frequency: u32, center: Center) -> Self {
        Self {
            holiday,
            spec: EffectSpec::new(start, end, frequency, center),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressorRow {
    pub year: i32,
    /// Month for monthly tables, quarter for quarterly ones.
    pub month: u32,
    /// One value per column, in `RegressorTable::columns` order.
    pub values: Vec<f64>,
}

/// `Year`, `Month`, and one column per holiday effect.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressorTable {
    pub frequency: u32,
    pub columns: Vec<String>,
    pub rows: Vec<RegressorRow>,
}

impl RegressorTable {
    /// Align the series on a shared `(year, period)` axis.
    ///
    /// The axis spans the union of all series; a series contributes `0.0`
    /// outside its own span. All series must share `frequency`.
    pub fn combine(frequency: u32, effects: Vec<(String, EffectSeries)>) -> Result<Self, HolidayError> {
        if let Some((_, bad)) = effects.iter().find(|(_, s)| s.frequency != frequency) {
            return Err(HolidayError::UnsupportedFrequency(bad.frequency));
        }

        let columns: Vec<String> = effects.iter().map(|(name, _)| name.clone()).collect();

        let bounds = effects
            .iter()
            .filter_map(|(_, s)| Some((s.period_at(0), s.end_period()?)))
            .fold(None, |acc: Option<((i32, u32), (i32, u32))>, (first, last)| match acc {
                None => Some((first, last)),
                Some((lo, hi)) => Some((lo.min(first), hi.max(last))),
            });

        let Some((first, last)) = bounds else {
            return Ok(Self {
                frequency,
                columns,
                rows: Vec::new(),
            });
        };

        let freq = frequency as i64;
        let index = |(year, period): (i32, u32)| -> i64 { year as i64 * freq + period as i64 - 1 };
        let base = index(first);
        let n_rows = (index(last) - base + 1) as usize;

        let mut rows: Vec<RegressorRow> = (0..n_rows)
            .map(|i| {
                let abs = base + i as i64;
                RegressorRow {
                    year: abs.div_euclid(freq) as i32,
                    month: (abs.rem_euclid(freq) + 1) as u32,
                    values: vec![0.0; columns.len()],
                }
            })
            .collect();

        for (col, (_, series)) in effects.iter().enumerate() {
            for (i, value) in series.values.iter().enumerate() {
                let row = (index(series.period_at(i)) - base) as usize;
                rows[row].values[col] = *value;
            }
        }

        Ok(Self {
            frequency,
            columns,
            rows,
        })
    }

    /// Last `n` rows (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[RegressorRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }
}

/// Summary rows -> effect dates -> generator -> aligned regressor table.
pub fn build_regressors(
    rows: &[HolidaySummaryRow],
    requests: &[EffectRequest],
    generator: &dyn HolidayEffectGenerator,
) -> Result<RegressorTable, HolidayError> {
    let frequency = requests.first().map(|r| r.spec.frequency).unwrap_or(12);

    let mut effects = Vec::with_capacity(requests.len());
    for request in requests {
        let dates = effect_dates(rows, request.holiday)?;
        let series = generator.generate(&dates, &request.spec)?;
        effects.push((request.holiday.column_name().to_string(), series));
    }

    RegressorTable::combine(frequency, effects)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;

    use super::*;
    use crate::genhol::Genhol;

    fn monthly(holiday: TrackedHoliday, window: (i64, i64)) -> EffectRequest {
        EffectRequest::new(holiday, window, 12, Center::Calendar)
    }

    /// Records the calls it receives and returns a fixed one-year series.
    struct RecordingGenerator {
        calls: RefCell<Vec<(Vec<String>, EffectSpec)>>,
    }

    impl HolidayEffectGenerator for RecordingGenerator {
        fn generate(&self, dates: &[String], spec: &EffectSpec) -> Result<EffectSeries, HolidayError> {
            self.calls.borrow_mut().push((dates.to_vec(), *spec));
            Ok(EffectSeries {
                start_year: 2020,
                start_period: 1,
                frequency: spec.frequency,
                values: vec![spec.start as f64; 12],
            })
        }
    }

    fn summary_rows() -> Vec<HolidaySummaryRow> {
        vec![
            HolidaySummaryRow {
                year: 2020,
                days_in_year: 12,
                carnival: NaiveDate::from_ymd_opt(2020, 2, 25),
                easter: NaiveDate::from_ymd_opt(2020, 4, 10),
                corpus: NaiveDate::from_ymd_opt(2020, 6, 11),
            },
            HolidaySummaryRow {
                year: 2021,
                days_in_year: 11,
                carnival: NaiveDate::from_ymd_opt(2021, 2, 16),
                easter: NaiveDate::from_ymd_opt(2021, 4, 2),
                corpus: None,
            },
        ]
    }

    #[test]
    fn generator_receives_formatted_dates_and_spec() {
        let generator = RecordingGenerator {
            calls: RefCell::new(Vec::new()),
        };
        let requests = [monthly(TrackedHoliday::Carnival, CARNIVAL_WINDOW), monthly(TrackedHoliday::Corpus, CORPUS_WINDOW)];

        let table = build_regressors(&summary_rows(), &requests, &generator).unwrap();

        let calls = generator.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, vec!["2020-02-25".to_string(), "2021-02-16".to_string()]);
        assert_eq!(calls[0].1, EffectSpec::new(-4, -1, 12, Center::Calendar));
        assert_eq!(calls[1].0, vec!["2020-06-11".to_string()]);

        assert_eq!(table.columns, vec!["Carnival".to_string(), "Corpus".to_string()]);
        assert_eq!(table.rows.len(), 12);
        assert_eq!(table.rows[0].values, vec![-4.0, 1.0]);
    }

    #[test]
    fn empty_column_stops_the_build() {
        let rows = vec![HolidaySummaryRow::empty(2020)];
        let err = build_regressors(&rows, &[monthly(TrackedHoliday::Corpus, CORPUS_WINDOW)], &Genhol).unwrap_err();
        assert_eq!(err, HolidayError::EmptyEffectInput { column: "Corpus" });
    }

    #[test]
    fn combine_aligns_different_spans() {
        let a = EffectSeries {
            start_year: 2020,
            start_period: 1,
            frequency: 12,
            values: vec![1.0; 12],
        };
        let b = EffectSeries {
            start_year: 2021,
            start_period: 1,
            frequency: 12,
            values: vec![2.0; 12],
        };

        let table = RegressorTable::combine(12, vec![("A".to_string(), a), ("B".to_string(), b)]).unwrap();

        assert_eq!(table.rows.len(), 24);
        assert_eq!((table.rows[0].year, table.rows[0].month), (2020, 1));
        assert_eq!(table.rows[0].values, vec![1.0, 0.0]);
        assert_eq!((table.rows[23].year, table.rows[23].month), (2021, 12));
        assert_eq!(table.rows[23].values, vec![0.0, 2.0]);
        assert_eq!(table.tail(2).len(), 2);
        assert_eq!(table.tail(100).len(), 24);
    }

    #[test]
    fn combine_rejects_mixed_frequencies() {
        let quarterly = EffectSeries {
            start_year: 2020,
            start_period: 1,
            frequency: 4,
            values: vec![0.0; 4],
        };
        let err = RegressorTable::combine(12, vec![("Q".to_string(), quarterly)]).unwrap_err();
        assert_eq!(err, HolidayError::UnsupportedFrequency(4));
    }

    #[test]
    fn genhol_end_to_end_is_calendar_centred() {
        let table = build_regressors(&summary_rows(), &[monthly(TrackedHoliday::Carnival, CARNIVAL_WINDOW)], &Genhol).unwrap();

        assert_eq!(table.rows.len(), 24);
        // Both Carnival windows fall entirely in February: centred effect is zero everywhere.
        assert!(table.rows.iter().all(|r| r.values[0].abs() < 1e-12));

        let centred = EffectRequest {
            holiday: TrackedHoliday::Easter,
            spec: EffectSpec {
                start: -8,
                end: Some(-1),
                frequency: 12,
                center: Center::Calendar,
            },
        };
        let table = build_regressors(&summary_rows(), &[centred], &Genhol).unwrap();
        // 2021 Easter window (Mar 25-Apr 1) straddles March/April; 2020 (Apr 2-9) does not.
        let march_2020 = table.rows[2].values[0];
        let march_2021 = table.rows[14].values[0];
        assert!(march_2020 < 0.0 && march_2021 > 0.0);
    }
}
