//! `br-genhol` library crate.
//!
//! The binary (`genhol`) is a thin wrapper around this library so that:
//!
//! - the holiday summary and effect generation are testable without network access
//! - the effect generator can be swapped (`genhol::HolidayEffectGenerator`)
//! - calendar sources (download, CSV, spreadsheet) share one pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod genhol;
pub mod holidays;
pub mod io;
pub mod logging;
pub mod report;
