//! Holiday summarization: raw calendar rows -> one adjusted row per year.

pub mod summary;

pub use summary::*;
