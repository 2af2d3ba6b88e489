//! Date-range selection.
//!
//! The aggregator accepts any range and answers gracefully with missing data.
//! Consumers that let a person pick a range check it here first, against the
//! bounds of the loaded dataset.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::data::{Repository, RepositoryError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid date range: {start} is after {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("{date} is outside the dataset ({first} to {last})")]
    OutOfBounds {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },
}

/// First and last date of the loaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetBounds {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DatasetBounds {
    pub fn from_repository(repo: &Repository) -> Result<Self, RepositoryError> {
        Ok(DatasetBounds {
            first: repo.earliest_date()?,
            last: repo.latest_date()?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

/// A selected, validated inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Accept `[start, end]` only if it is ordered and lies inside `bounds`
    pub fn select(
        start: NaiveDate,
        end: NaiveDate,
        bounds: &DatasetBounds,
    ) -> Result<Self, RangeError> {
        for date in [start, end] {
            if !bounds.contains(date) {
                return Err(RangeError::OutOfBounds {
                    date,
                    first: bounds.first,
                    last: bounds.last,
                });
            }
        }
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Inclusive day count
    pub fn days(&self) -> i64 {
        crate::stats::aggregator::inclusive_days(self.start, self.end)
    }

    /// Range in `dd/mm/yyyy` form, as shown next to a selection
    pub fn describe(&self) -> String {
        format!(
            "Selected: {} to {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}
