//! Data layer for the COVID dataset's SQLite database.
//!
//! Holds the record model and the read-only repository over the `CovidData` table.

mod models;
mod repository;

#[cfg(test)]
pub(crate) mod fixture;

pub use models::{DailyRecord, Field, REGION_COUNT};
pub use repository::{Repository, RepositoryError};
