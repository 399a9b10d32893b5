//! CSV exports.
//!
//! The regressor export is shaped for X-13 user regressors: `Year`, `Month`,
//! then one column per holiday effect.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::data::SeriesSet;
use crate::domain::{HolidaySummaryRow, TrackedHoliday};
use crate::error::AppError;
use crate::genhol::RegressorTable;

/// Write the per-year summary (`Year,Days by Year,Carnival,Easter,Corpus`).
pub fn write_summary_csv(path: &Path, rows: &[HolidaySummaryRow]) -> Result<(), AppError> {
    let mut writer = create_writer(path)?;

    let mut header = vec!["Year".to_string(), "Days by Year".to_string()];
    header.extend(TrackedHoliday::ALL.iter().map(|h| h.column_name().to_string()));
    writer.write_record(&header).map_err(write_err)?;

    for row in rows {
        let mut record = vec![row.year.to_string(), row.days_in_year.to_string()];
        record.extend(
            TrackedHoliday::ALL
                .iter()
                .map(|h| row.get(*h).map(|d| d.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(write_err)?;
    }

    writer.flush().map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write the regressor table.
pub fn write_regressors_csv(path: &Path, table: &RegressorTable) -> Result<(), AppError> {
    let writer = create_writer(path)?;
    write_regressors(writer, table)
}

/// Write SIDRA series in long format (`variable,date,value`).
pub fn write_series_csv(path: &Path, series: &SeriesSet) -> Result<(), AppError> {
    let mut writer = create_writer(path)?;

    writer.write_record(["variable", "date", "value"]).map_err(write_err)?;
    for (code, points) in &series.series {
        for (date, value) in points {
            writer
                .write_record([code.clone(), date.to_string(), value.to_string()])
                .map_err(write_err)?;
        }
    }

    writer.flush().map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

fn write_regressors<W: Write>(mut writer: csv::Writer<W>, table: &RegressorTable) -> Result<(), AppError> {
    let period_label = if table.frequency == 4 { "Quarter" } else { "Month" };
    let mut header = vec!["Year".to_string(), period_label.to_string()];
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header).map_err(write_err)?;

    for row in &table.rows {
        let mut record = vec![row.year.to_string(), row.month.to_string()];
        record.extend(row.values.iter().map(|v| format!("{v:.10}")));
        writer.write_record(&record).map_err(write_err)?;
    }

    writer.flush().map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

fn create_writer(path: &Path) -> Result<csv::Writer<File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_err(e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write export CSV row: {e}"))
}
