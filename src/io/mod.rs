//! Input/output helpers.
//!
//! - calendar ingest from CSV or spreadsheets (`ingest`)
//! - CSV exports of summaries, regressors and series (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
