//! Command-line parsing for the holiday regressor tool.
//!
//! Argument parsing and command dispatch are kept apart from the summarizing
//! and effect-generation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::sidra::{PIMPF_CLASSIFICATION, PIMPF_TABLE, PIMPF_VARIABLES};
use crate::domain::{Center, parse_date_text};
use crate::genhol::{CARNIVAL_WINDOW, CORPUS_WINDOW, MAX_WINDOW_OFFSET};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "genhol",
    version,
    about = "Brazilian holiday regressors for seasonal adjustment (ANBIMA calendar, IBGE SIDRA series)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize the holiday calendar: one row per year with Carnival, Easter and Corpus Christi.
    Summary(SummaryArgs),
    /// Build monthly holiday-effect regressors (Year, Month, one column per holiday).
    Regressors(RegressorArgs),
    /// Fetch the industrial production series from SIDRA.
    Series(SeriesArgs),
}

/// Where the calendar comes from and how it is adjusted.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Local calendar file (.csv, .xls, .xlsx, .ods) instead of downloading it from ANBIMA.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// First year kept (inclusive).
    #[arg(long, default_value_t = 2001)]
    pub start_year: i32,

    /// Last year kept (inclusive). Defaults to next calendar year.
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Replace a Carnival date, e.g. `--override 2022-03-01=2022-03-02`. Repeatable.
    #[arg(long = "override", value_name = "OLD=NEW", value_parser = parse_override)]
    pub overrides: Vec<(NaiveDate, NaiveDate)>,

    /// Do not apply the built-in Carnival Tuesday -> Wednesday exceptions (2003, 2014, 2022, 2025).
    #[arg(long)]
    pub no_default_overrides: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Export the summary to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RegressorArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First day of the Carnival window, relative to the holiday.
    #[arg(long, default_value_t = CARNIVAL_WINDOW.0, allow_negative_numbers = true, value_parser = window_offset())]
    pub carnival_start: i64,

    /// Last day of the Carnival window, relative to the holiday.
    #[arg(long, default_value_t = CARNIVAL_WINDOW.1, allow_negative_numbers = true, value_parser = window_offset())]
    pub carnival_end: i64,

    /// First day of the Corpus Christi window, relative to the holiday.
    #[arg(long, default_value_t = CORPUS_WINDOW.0, allow_negative_numbers = true, value_parser = window_offset())]
    pub corpus_start: i64,

    /// Last day of the Corpus Christi window, relative to the holiday.
    #[arg(long, default_value_t = CORPUS_WINDOW.1, allow_negative_numbers = true, value_parser = window_offset())]
    pub corpus_end: i64,

    /// Also build a Good Friday ("Easter") regressor starting this many days from the holiday.
    #[arg(long, allow_negative_numbers = true, value_parser = window_offset())]
    pub easter_start: Option<i64>,

    /// Last day of the Easter window (used with `--easter-start`).
    #[arg(long, default_value_t = -1, allow_negative_numbers = true, value_parser = window_offset())]
    pub easter_end: i64,

    /// Periods per year (12 monthly, 4 quarterly).
    #[arg(long, default_value_t = 12, value_parser = parse_frequency)]
    pub frequency: u32,

    /// Centering applied to the effect shares.
    #[arg(long, value_enum, default_value_t = Center::Calendar)]
    pub center: Center,

    /// Number of trailing periods to print.
    #[arg(long, default_value_t = 24)]
    pub tail: usize,

    /// Export the full regressor table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// SIDRA table code.
    #[arg(long, default_value = PIMPF_TABLE)]
    pub table: String,

    /// Territorial level (`1` = Brazil).
    #[arg(long, default_value = "1")]
    pub territorial_level: String,

    /// Territorial code within the level.
    #[arg(long, default_value = "all")]
    pub territorial_code: String,

    /// Variable codes (comma-separated).
    #[arg(long, value_delimiter = ',', default_values = PIMPF_VARIABLES)]
    pub variables: Vec<String>,

    /// Periods (`all`, `last 12`, or `YYYYMM` codes; comma-separated).
    #[arg(long, value_delimiter = ',', default_values = ["all"])]
    pub period: Vec<String>,

    /// Classification filter, `<classification>/<category>`.
    #[arg(long, default_value = PIMPF_CLASSIFICATION)]
    pub classification: String,

    /// Export the series to CSV (long format).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

fn window_offset() -> clap::builder::RangedI64ValueParser<i64> {
    clap::value_parser!(i64).range(-MAX_WINDOW_OFFSET..=MAX_WINDOW_OFFSET)
}

fn parse_frequency(s: &str) -> Result<u32, String> {
    match s.trim() {
        "12" => Ok(12),
        "4" => Ok(4),
        other => Err(format!("Unsupported frequency '{other}' (expected 4 or 12).")),
    }
}

/// Parse `OLD=NEW` into a date pair.
pub fn parse_override(s: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let (old, new) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid override '{s}'. Expected OLD=NEW, e.g. 2022-03-01=2022-03-02."))?;
    let parse = |part: &str| parse_date_text(part).ok_or_else(|| format!("Invalid date '{}' in override '{s}'.", part.trim()));
    Ok((parse(old)?, parse(new)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn override_parsing() {
        assert_eq!(parse_override("2022-03-01=2022-03-02"), Ok((d(2022, 3, 1), d(2022, 3, 2))));
        assert_eq!(parse_override("01/03/2022 = 02/03/2022"), Ok((d(2022, 3, 1), d(2022, 3, 2))));
        assert!(parse_override("2022-03-01").is_err());
        assert!(parse_override("2022-03-01=tomorrow").is_err());
    }

    #[test]
    fn regressor_defaults() {
        let cli = Cli::try_parse_from(["genhol", "regressors"]).unwrap();
        let Command::Regressors(args) = cli.command else {
            panic!("expected regressors");
        };
        assert_eq!((args.carnival_start, args.carnival_end), (-4, -1));
        assert_eq!((args.corpus_start, args.corpus_end), (1, 3));
        assert_eq!(args.easter_start, None);
        assert_eq!(args.frequency, 12);
        assert_eq!(args.center, Center::Calendar);
        assert_eq!(args.source.start_year, 2001);
        assert!(args.source.overrides.is_empty());
    }

    #[test]
    fn negative_windows_and_repeated_overrides() {
        let cli = Cli::try_parse_from([
            "genhol",
            "regressors",
            "--carnival-start",
            "-6",
            "--easter-start",
            "-8",
            "--frequency",
            "4",
            "--override",
            "2020-02-25=2020-02-26",
            "--override",
            "2021-02-16=2021-02-17",
            "--input",
            "feriados.csv",
        ])
        .unwrap();
        let Command::Regressors(args) = cli.command else {
            panic!("expected regressors");
        };
        assert_eq!(args.carnival_start, -6);
        assert_eq!(args.easter_start, Some(-8));
        assert_eq!(args.frequency, 4);
        assert_eq!(args.source.overrides.len(), 2);
        assert_eq!(args.source.input, Some(PathBuf::from("feriados.csv")));
    }

    #[test]
    fn window_offsets_are_bounded() {
        assert!(Cli::try_parse_from(["genhol", "regressors", "--carnival-start", "-366"]).is_ok());
        assert!(Cli::try_parse_from(["genhol", "regressors", "--carnival-start", "-367"]).is_err());
        assert!(
            Cli::try_parse_from(["genhol", "regressors", "--easter-start", "-9223372036854775808"]).is_err()
        );
        assert!(Cli::try_parse_from(["genhol", "regressors", "--corpus-end", "100000000000000"]).is_err());
    }

    #[test]
    fn unsupported_frequency_is_rejected() {
        assert!(Cli::try_parse_from(["genhol", "regressors", "--frequency", "52"]).is_err());
    }

    #[test]
    fn series_defaults_match_pimpf() {
        let cli = Cli::try_parse_from(["genhol", "series", "--variables", "12606"]).unwrap();
        let Command::Series(args) = cli.command else {
            panic!("expected series");
        };
        assert_eq!(args.table, "8888");
        assert_eq!(args.variables, vec!["12606".to_string()]);
        assert_eq!(args.period, vec!["all".to_string()]);
        assert_eq!(args.classification, "544/129314");
    }
}
