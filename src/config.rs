//! Source configuration.
//!
//! Resolved once by the application layer (after `.env` is loaded) and passed
//! explicitly to the clients; nothing below `app` reads the environment.

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_ANBIMA_URL: &str = "https://www.anbima.com.br/feriados/arqs/feriados_nacionais.xls";
pub const DEFAULT_SIDRA_ROOT: &str = "https://apisidra.ibge.gov.br/values/t/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub anbima_url: String,
    pub sidra_root: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            anbima_url: DEFAULT_ANBIMA_URL.to_string(),
            sidra_root: DEFAULT_SIDRA_ROOT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SourceConfig {
    /// Load `.env` (if any) and read `ANBIMA_HOLIDAYS_URL`, `SIDRA_API_ROOT`
    /// and `HTTP_TIMEOUT_SECS`, falling back to the public defaults.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| AppError::new(2, format!("Invalid HTTP_TIMEOUT_SECS '{raw}' (expected a positive integer).")))?;
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        Ok(Self {
            anbima_url: non_empty("ANBIMA_HOLIDAYS_URL").unwrap_or(defaults.anbima_url),
            sidra_root: non_empty("SIDRA_API_ROOT").unwrap_or(defaults.sidra_root),
            timeout,
        })
    }
}
