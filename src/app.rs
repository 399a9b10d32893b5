//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the source configuration (`.env` included) and sets up logging
//! - loads and summarizes the holiday calendar
//! - builds holiday regressors or fetches SIDRA series
//! - prints reports and writes optional exports

use chrono::{Datelike, Local};
use clap::Parser;

use crate::cli::{Command, RegressorArgs, SeriesArgs, SourceArgs, SummaryArgs};
use crate::config::SourceConfig;
use crate::data::SidraQuery;
use crate::domain::{DateOverrideMap, TrackedHoliday, YearRange};
use crate::error::AppError;
use crate::genhol::{EffectRequest, Genhol};

pub mod pipeline;

/// Entry point for the `genhol` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    // Loads `.env`, which may carry RUST_LOG / GENHOL_LOG_FORMAT.
    let config = SourceConfig::from_env()?;
    crate::logging::init();

    match cli.command {
        Command::Summary(args) => handle_summary(args, &config),
        Command::Regressors(args) => handle_regressors(args, &config),
        Command::Series(args) => handle_series(args, &config),
    }
}

fn handle_summary(args: SummaryArgs, config: &SourceConfig) -> Result<(), AppError> {
    let options = holiday_options_from_args(&args.source, Local::now().year())?;
    let run = pipeline::run_summary(&options, config)?;

    println!("{}", crate::report::format_summary(&run.rows, Some(run.range)));

    if let Some(path) = &args.export {
        crate::io::export::write_summary_csv(path, &run.rows)?;
    }
    Ok(())
}

fn handle_regressors(args: RegressorArgs, config: &SourceConfig) -> Result<(), AppError> {
    let options = holiday_options_from_args(&args.source, Local::now().year())?;
    let run = pipeline::run_summary(&options, config)?;
    let requests = effect_requests_from_args(&args);
    let table = pipeline::run_regressors(&run, &requests, &Genhol)?;

    println!("{}", crate::report::format_regressors(&table, args.tail));

    if let Some(path) = &args.export {
        crate::io::export::write_regressors_csv(path, &table)?;
    }
    Ok(())
}

fn handle_series(args: SeriesArgs, config: &SourceConfig) -> Result<(), AppError> {
    let query = SidraQuery {
        table_code: args.table,
        territorial_level: args.territorial_level,
        territorial_code: args.territorial_code,
        variables: args.variables,
        periods: args.period,
        classification: args.classification,
    };
    let set = pipeline::run_series(&query, config)?;

    println!("{}", crate::report::format_series(&set));

    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &set)?;
    }
    Ok(())
}

/// Resolve source flags; `current_year` feeds the default end year (next year).
pub fn holiday_options_from_args(
    args: &SourceArgs,
    current_year: i32,
) -> Result<pipeline::HolidayOptions, AppError> {
    let range = YearRange::new(args.start_year, args.end_year.unwrap_or(current_year + 1));
    if range.start_year > range.end_year {
        return Err(AppError::new(
            2,
            format!(
                "--start-year {} is after --end-year {}.",
                range.start_year, range.end_year
            ),
        ));
    }

    let defaults = if args.no_default_overrides {
        DateOverrideMap::default()
    } else {
        DateOverrideMap::carnival_defaults()
    };
    let overrides = DateOverrideMap::new(args.overrides.iter().copied())
        .and_then(|manual| defaults.extended(&manual))
        .map_err(|e| AppError::new(2, e.to_string()))?;

    Ok(pipeline::HolidayOptions {
        input: args.input.clone(),
        range,
        overrides,
    })
}

pub fn effect_requests_from_args(args: &RegressorArgs) -> Vec<EffectRequest> {
    let request = |holiday, window| EffectRequest::new(holiday, window, args.frequency, args.center);

    let mut requests = vec![
        request(TrackedHoliday::Carnival, (args.carnival_start, args.carnival_end)),
        request(TrackedHoliday::Corpus, (args.corpus_start, args.corpus_end)),
    ];
    if let Some(start) = args.easter_start {
        requests.push(request(TrackedHoliday::Easter, (start, args.easter_end)));
    }
    requests
}
