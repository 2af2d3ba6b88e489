//! Heat-map bucketing of per-borough changes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregator::Aggregator;
use crate::data::{Field, RepositoryError};

/// Bucket boundaries as fractions of the cross-borough maximum
const HIGH_FRACTION: f64 = 0.66;
const MID_FRACTION: f64 = 0.33;

/// Discrete heat-map bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Absent,
    Low,
    Mid,
    High,
    Peak,
}

impl Bucket {
    /// Conventional fill colour (RGB hex) for the bucket
    pub fn color_hint(self) -> &'static str {
        match self {
            Bucket::Absent => "#2C3E50",
            Bucket::Low => "#008000",
            Bucket::Mid => "#FFC800",
            Bucket::High => "#FF6400",
            Bucket::Peak => "#FF0000",
        }
    }
}

/// Place `value` relative to `max`. Either side missing gives `Bucket::Absent`.
///
/// Boundaries are strict: exactly 66% of the maximum is `Mid`, not `High`.
pub fn classify(value: Option<i64>, max: Option<i64>) -> Bucket {
    let (Some(value), Some(max)) = (value, max) else {
        return Bucket::Absent;
    };

    let value_f = value as f64;
    let max_f = max as f64;
    if value == max {
        Bucket::Peak
    } else if value_f > max_f * HIGH_FRACTION {
        Bucket::High
    } else if value_f > max_f * MID_FRACTION {
        Bucket::Mid
    } else {
        Bucket::Low
    }
}

/// One borough's change and bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatCell {
    pub region: String,
    pub value: Option<i64>,
    pub bucket: Bucket,
}

/// Buckets for every borough over one range
#[derive(Debug, Clone, Serialize)]
pub struct HeatMap {
    pub field: Field,
    pub max: Option<i64>,
    pub cells: Vec<HeatCell>,
}

impl HeatMap {
    /// Classify every borough's change in `field` against the largest change in any borough
    pub fn build(
        agg: &Aggregator<'_>,
        field: Field,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, RepositoryError> {
        let max = agg.max_delta(field, start, end)?;

        let cells = agg
            .repository()
            .regions()?
            .into_iter()
            .map(|region| {
                let value = agg.delta(field, start, end, Some(region.as_str()))?;
                Ok(HeatCell {
                    bucket: classify(value, max),
                    region,
                    value,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(HeatMap { field, max, cells })
    }

    /// Region to bucket lookup
    pub fn buckets(&self) -> BTreeMap<&str, Bucket> {
        self.cells
            .iter()
            .map(|cell| (cell.region.as_str(), cell.bucket))
            .collect()
    }
}
