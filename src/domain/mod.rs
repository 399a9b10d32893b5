//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw calendar rows (`RawHolidayRecord`, `RawDate`)
//! - the per-year summary (`HolidaySummaryRow`, `TrackedHoliday`)
//! - adjustment inputs (`DateOverrideMap`, `YearRange`)
//! - effect-generation parameters and outputs (`EffectSpec`, `EffectSeries`)

pub mod types;

pub use types::*;
