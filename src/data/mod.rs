//! Remote data sources.
//!
//! - ANBIMA national holiday calendar (`anbima`)
//! - IBGE SIDRA industrial production series (`sidra`)

pub mod anbima;
pub mod sidra;

pub use anbima::AnbimaClient;
pub use sidra::{SeriesSet, SidraClient, SidraQuery, SidraRecord, group_series};
