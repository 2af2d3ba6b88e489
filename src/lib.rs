//! covid-stats: range-scoped analytics over a per-borough daily COVID-19 dataset.
//!
//! The dataset is a read-only SQLite table of cumulative case and death counts
//! plus Google mobility readings. Queries answer with `Option<i64>`: `None`
//! means the range lacks the data, never zero.

pub mod cli;
pub mod data;
pub mod range;
pub mod report;
pub mod stats;
