//! ANBIMA national holiday calendar download.
//!
//! ANBIMA publishes the calendar as a legacy `.xls` workbook. The body is
//! staged in a temporary file (removed when the handle drops) and read with the
//! same spreadsheet reader used for local copies.

use std::io::Write;

use reqwest::blocking::Client;
use tracing::info;

use crate::config::SourceConfig;
use crate::domain::RawHolidayRecord;
use crate::error::AppError;
use crate::io::ingest::read_spreadsheet_records;

pub struct AnbimaClient {
    client: Client,
    url: String,
}

impl AnbimaClient {
    pub fn new(config: &SourceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.anbima_url.clone(),
        })
    }

    /// Download the calendar and return its raw rows (header already skipped).
    pub fn fetch_records(&self) -> Result<Vec<RawHolidayRecord>, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("ANBIMA request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("ANBIMA request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::new(4, format!("Failed to read ANBIMA response: {e}")))?;

        let mut staged = tempfile::Builder::new()
            .prefix("feriados_nacionais")
            .suffix(&staged_suffix(&self.url))
            .tempfile()
            .map_err(|e| AppError::new(2, format!("Failed to create temporary file: {e}")))?;
        staged
            .write_all(&body)
            .and_then(|_| staged.flush())
            .map_err(|e| AppError::new(2, format!("Failed to stage ANBIMA calendar: {e}")))?;

        let records = read_spreadsheet_records(staged.path())?;
        info!(url = %self.url, bytes = body.len(), rows = records.len(), "downloaded ANBIMA calendar");
        Ok(records)
    }
}

/// Keep the URL's spreadsheet extension so the reader picks the right format.
fn staged_suffix(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| matches!(ext.as_str(), "xls" | "xlsx" | "xlsm" | "xlsb" | "ods"));
    format!(".{}", ext.as_deref().unwrap_or("xls"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_follows_url_extension() {
        assert_eq!(staged_suffix(crate::config::DEFAULT_ANBIMA_URL), ".xls");
        assert_eq!(staged_suffix("http://mirror/feriados.XLSX?v=2"), ".xlsx");
        assert_eq!(staged_suffix("http://mirror/download"), ".xls");
    }

    #[test]
    fn unreachable_host_is_an_upstream_failure() {
        let config = SourceConfig {
            anbima_url: "http://127.0.0.1:9/feriados.xls".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..SourceConfig::default()
        };
        let err = AnbimaClient::new(&config).unwrap().fetch_records().unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
