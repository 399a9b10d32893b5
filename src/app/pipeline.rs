//! Shared holiday pipeline used by the `summary` and `regressors` commands.
//!
//! calendar (download or file) -> summarize -> Carnival overrides -> year filter
//! -> (optionally) effect generation -> regressor table

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::data::{AnbimaClient, SeriesSet, SidraClient, SidraQuery, group_series};
use crate::domain::{DateOverrideMap, HolidaySummaryRow, RawHolidayRecord, YearRange};
use crate::error::AppError;
use crate::genhol::{EffectRequest, HolidayEffectGenerator, RegressorTable, build_regressors};
use crate::holidays::{apply_overrides, filter_by_year_range, summarize};

/// Resolved options for one holiday run.
#[derive(Debug, Clone)]
pub struct HolidayOptions {
    /// Local calendar file; `None` downloads it from ANBIMA.
    pub input: Option<PathBuf>,
    pub range: YearRange,
    pub overrides: DateOverrideMap,
}

/// All computed outputs of a holiday run.
#[derive(Debug, Clone)]
pub struct HolidayRun {
    pub records_read: usize,
    /// Full summary, before overrides and filtering.
    pub summary: Vec<HolidaySummaryRow>,
    /// Overridden and year-filtered rows handed to effect generation.
    pub rows: Vec<HolidaySummaryRow>,
    pub range: YearRange,
}

/// Load the calendar and run the summary steps.
pub fn run_summary(options: &HolidayOptions, config: &SourceConfig) -> Result<HolidayRun, AppError> {
    let records = match &options.input {
        Some(path) => crate::io::load_holiday_records(path)?,
        None => AnbimaClient::new(config)?.fetch_records()?,
    };
    run_summary_with_records(&records, options)
}

/// Run the summary steps on already-loaded records.
pub fn run_summary_with_records(
    records: &[RawHolidayRecord],
    options: &HolidayOptions,
) -> Result<HolidayRun, AppError> {
    let summary = summarize(records);
    if summary.is_empty() {
        return Err(AppError::new(3, "No calendar rows with a valid date were found."));
    }

    for (from, to) in options.overrides.iter() {
        debug!(%from, %to, "carnival override");
    }
    let adjusted = apply_overrides(&summary, &options.overrides);
    let rows = filter_by_year_range(&adjusted, options.range.start_year, options.range.end_year);

    info!(
        records = records.len(),
        years = summary.len(),
        kept = rows.len(),
        overrides = options.overrides.len(),
        "summarized holiday calendar"
    );

    Ok(HolidayRun {
        records_read: records.len(),
        summary,
        rows,
        range: options.range,
    })
}

/// Turn the filtered rows of a run into a regressor table.
pub fn run_regressors(
    run: &HolidayRun,
    requests: &[EffectRequest],
    generator: &dyn HolidayEffectGenerator,
) -> Result<RegressorTable, AppError> {
    let table = build_regressors(&run.rows, requests, generator)?;
    info!(
        periods = table.rows.len(),
        columns = table.columns.len(),
        "built holiday regressors"
    );
    Ok(table)
}

/// Fetch and group a SIDRA table.
pub fn run_series(query: &SidraQuery, config: &SourceConfig) -> Result<SeriesSet, AppError> {
    let records = SidraClient::new(config)?.fetch(query)?;
    let set = group_series(&records);
    if set.series.is_empty() {
        return Err(AppError::new(3, "SIDRA returned no valid observations."));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Center, TrackedHoliday};
    use crate::genhol::{CARNIVAL_WINDOW, CORPUS_WINDOW, Genhol};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn calendar() -> Vec<RawHolidayRecord> {
        vec![
            RawHolidayRecord::from_text("Data", "Dia da Semana", "Feriado"),
            RawHolidayRecord::new(d(2021, 2, 15), "segunda-feira", "Carnaval"),
            RawHolidayRecord::new(d(2021, 2, 16), "terça-feira", "Carnaval"),
            RawHolidayRecord::new(d(2021, 6, 3), "quinta-feira", "Corpus Christi"),
            RawHolidayRecord::new(d(2022, 2, 28), "segunda-feira", "Carnaval"),
            RawHolidayRecord::new(d(2022, 3, 1), "terça-feira", "Carnaval"),
            RawHolidayRecord::new(d(2022, 4, 15), "sexta-feira", "Paixão de Cristo"),
            RawHolidayRecord::new(d(2022, 6, 16), "quinta-feira", "Corpus Christi"),
            RawHolidayRecord::new(d(2023, 2, 21), "terça-feira", "Carnaval"),
            RawHolidayRecord::from_text("Fonte: ANBIMA", "", ""),
        ]
    }

    fn options(start: i32, end: i32) -> HolidayOptions {
        HolidayOptions {
            input: None,
            range: YearRange::new(start, end),
            overrides: DateOverrideMap::carnival_defaults(),
        }
    }

    #[test]
    fn summary_then_overrides_then_filter() {
        let run = run_summary_with_records(&calendar(), &options(2021, 2022)).unwrap();

        assert_eq!(run.records_read, 10);
        assert_eq!(run.summary.len(), 3);
        assert_eq!(run.rows.len(), 2);
        // 2022 Carnival moves to Ash Wednesday; the unfiltered summary keeps the raw date.
        assert_eq!(run.rows[1].carnival, Some(d(2022, 3, 2)));
        assert_eq!(run.summary[1].carnival, Some(d(2022, 3, 1)));
        assert_eq!(run.rows[0].days_in_year, 3);
    }

    #[test]
    fn calendar_without_dates_is_rejected() {
        let records = vec![RawHolidayRecord::from_text("Data", "Dia", "Feriado")];
        let err = run_summary_with_records(&records, &options(2001, 2030)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn regressors_from_run() {
        let run = run_summary_with_records(&calendar(), &options(2021, 2022)).unwrap();
        let requests = [
            EffectRequest::new(TrackedHoliday::Carnival, CARNIVAL_WINDOW, 12, Center::Calendar),
            EffectRequest::new(TrackedHoliday::Corpus, CORPUS_WINDOW, 12, Center::Calendar),
        ];

        let table = run_regressors(&run, &requests, &Genhol).unwrap();
        assert_eq!(table.rows.len(), 24);
        assert_eq!((table.rows[0].year, table.rows[0].month), (2021, 1));
    }

    #[test]
    fn empty_effect_column_surfaces_as_exit_code_3() {
        let run = run_summary_with_records(&calendar(), &options(2023, 2023)).unwrap();
        let err = run_regressors(&run, &[EffectRequest::new(TrackedHoliday::Corpus, CORPUS_WINDOW, 12, Center::Calendar)], &Genhol).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "The column Corpus contains no valid dates.");
    }

    #[test]
    fn local_csv_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feriados.csv");
        std::fs::write(
            &path,
            "Data,Dia da Semana,Feriado\n25/02/2020,terça-feira,Carnaval\n11/06/2020,quinta-feira,Corpus Christi\n",
        )
        .unwrap();

        let mut opts = options(2020, 2020);
        opts.input = Some(path);
        let run = run_summary(&opts, &SourceConfig::default()).unwrap();
        assert_eq!(run.rows.len(), 1);
        assert_eq!(run.rows[0].corpus, Some(d(2020, 6, 11)));
    }
}
