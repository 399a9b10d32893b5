//! Calendar ingest.
//!
//! Turns a holiday calendar file into `RawHolidayRecord`s. The calendar has
//! three positional columns (date, day of week, holiday name) after a header
//! row; the exact header text is not relied upon.
//!
//! - `.csv` is read with the `csv` crate (UTF-8, or Windows-1252 as a fallback)
//! - `.xls` / `.xlsx` / `.ods` are read with `calamine` (first worksheet)
//!
//! Rows whose first column is not a date are kept as `RawDate::Other`; dropping
//! them is the summarizer's job.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use tracing::{debug, info};

use crate::domain::{RawDate, RawHolidayRecord};
use crate::error::AppError;

/// Load a calendar from a local file, choosing the reader by extension.
pub fn load_holiday_records(path: &Path) -> Result<Vec<RawHolidayRecord>, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let records = match ext.as_str() {
        "csv" => {
            let file = File::open(path)
                .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
            read_csv_records(file)?
        }
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => read_spreadsheet_records(path)?,
        other => {
            return Err(AppError::new(
                2,
                format!(
                    "Unsupported calendar file extension '{other}' for '{}'. Expected .csv, .xls, .xlsx or .ods.",
                    path.display()
                ),
            ));
        }
    };

    info!(path = %path.display(), rows = records.len(), "loaded holiday calendar");
    Ok(records)
}

/// Read a three-column calendar CSV (header row first).
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RawHolidayRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut record = ByteRecord::new();
    let mut line = 1usize;

    loop {
        line += 1;
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => {
                return Err(AppError::new(2, format!("Failed to read calendar CSV: {e}")));
            }
            Err(e) => {
                debug!(line, error = %e, "skipping unreadable CSV row");
                continue;
            }
        }

        let field = |idx: usize| record.get(idx).map(decode_field).unwrap_or_default();
        records.push(RawHolidayRecord::from_text(&field(0), &field(1), &field(2)));
    }

    Ok(records)
}

/// Read the first worksheet of a spreadsheet, skipping its header row.
pub fn read_spreadsheet_records(path: &Path) -> Result<Vec<RawHolidayRecord>, AppError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::new(2, format!("Failed to open spreadsheet '{}': {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::new(3, format!("Spreadsheet '{}' has no worksheets.", path.display())))?
        .map_err(|e| AppError::new(2, format!("Failed to read worksheet of '{}': {e}", path.display())))?;

    let records = range
        .rows()
        .skip(1)
        .map(|row| {
            let text = |idx: usize| row.get(idx).map(|c| c.to_string()).unwrap_or_default();
            RawHolidayRecord {
                date: row.first().map(cell_date).unwrap_or_else(|| RawDate::Other(String::new())),
                weekday_label: text(1).trim().to_string(),
                holiday_name: text(2).trim().to_string(),
            }
        })
        .collect();

    Ok(records)
}

/// Interpret a spreadsheet cell as a date.
///
/// Only date-formatted cells and date-like text count; plain numbers and
/// durations are not promoted to dates. The workbook's date system (1900 or
/// 1904) travels with the cell.
fn cell_date(cell: &Data) -> RawDate {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(t) => RawDate::Date(t.date()),
            None => RawDate::Other(cell.to_string()),
        },
        Data::String(s) | Data::DateTimeIso(s) => RawDate::from_text(s),
        other => RawDate::Other(other.to_string()),
    }
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}
