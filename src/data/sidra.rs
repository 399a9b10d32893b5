//! IBGE SIDRA API integration for the industrial production (PIM-PF) series.
//!
//! SIDRA answers with a JSON array of flat objects; the first element is a
//! header row describing the columns, the rest are observations. Only three
//! fields matter here: `D2C`/`D2N` (variable code/name), `D3C` (period as
//! `YYYYMM`) and `V` (value as text).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::error::AppError;

/// PIM-PF: Produção Física Industrial, por seções e atividades industriais.
pub const PIMPF_TABLE: &str = "8888";
/// Index numbers: without and with seasonal adjustment.
pub const PIMPF_VARIABLES: [&str; 2] = ["12606", "12607"];
/// Classification 544 (sections and activities), category "Indústria geral".
pub const PIMPF_CLASSIFICATION: &str = "544/129314";

/// Parameters of a `/values` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidraQuery {
    pub table_code: String,
    pub territorial_level: String,
    pub territorial_code: String,
    pub variables: Vec<String>,
    pub periods: Vec<String>,
    pub classification: String,
}

impl SidraQuery {
    /// `{root}{table}/n{level}/{code}/v/{v1|v2}/p/{p1-p2}/c{classification}`
    pub fn url(&self, root: &str) -> String {
        format!(
            "{root}{}/n{}/{}/v/{}/p/{}/c{}",
            self.table_code,
            self.territorial_level,
            self.territorial_code,
            self.variables.join("|"),
            self.periods.join("-"),
            self.classification,
        )
    }
}

/// One element of the SIDRA response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SidraRecord {
    #[serde(rename = "NC")]
    pub nc: String,
    #[serde(rename = "NN")]
    pub nn: String,
    #[serde(rename = "MC")]
    pub mc: String,
    #[serde(rename = "MN")]
    pub mn: String,
    #[serde(rename = "V")]
    pub v: String,
    #[serde(rename = "D1C")]
    pub d1c: String,
    #[serde(rename = "D1N")]
    pub d1n: String,
    #[serde(rename = "D2C")]
    pub d2c: String,
    #[serde(rename = "D2N")]
    pub d2n: String,
    #[serde(rename = "D3C")]
    pub d3c: String,
    #[serde(rename = "D3N")]
    pub d3n: String,
    #[serde(rename = "D4C", default)]
    pub d4c: String,
    #[serde(rename = "D4N", default)]
    pub d4n: String,
}

/// Observations grouped by variable code (`D2C`), each sorted by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    pub series: BTreeMap<String, Vec<(NaiveDate, f64)>>,
    /// Variable code -> variable name (`D2N`).
    pub legends: BTreeMap<String, String>,
}

pub struct SidraClient {
    client: Client,
    root: String,
}

impl SidraClient {
    pub fn new(config: &SourceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            root: config.sidra_root.clone(),
        })
    }

    pub fn fetch(&self, query: &SidraQuery) -> Result<Vec<SidraRecord>, AppError> {
        let url = query.url(&self.root);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::new(4, format!("SIDRA request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("SIDRA request to {url} failed with status {}.", resp.status()),
            ));
        }

        let records: Vec<SidraRecord> = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse SIDRA response: {e}")))?;

        info!(%url, records = records.len(), "fetched SIDRA table");
        Ok(records)
    }
}

/// Group records by variable, skipping entries without a valid period or value.
pub fn group_series(records: &[SidraRecord]) -> SeriesSet {
    let mut out = SeriesSet::default();

    for record in records {
        let (Some(date), Some(value)) = (parse_period(&record.d3c), parse_value(&record.v)) else {
            warn!(d3c = %record.d3c, v = %record.v, "skipping invalid SIDRA entry");
            continue;
        };
        out.series.entry(record.d2c.clone()).or_default().push((date, value));
        out.legends.insert(record.d2c.clone(), record.d2n.clone());
    }

    for points in out.series.values_mut() {
        points.sort_by_key(|(d, _)| *d);
    }

    out
}

/// `YYYYMM` -> first day of that month.
fn parse_period(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = raw[..4].parse().ok()?;
    let month: u32 = raw[4..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn parse_value(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
