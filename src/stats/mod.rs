//! Aggregations and derived statistics over the repository.

pub mod aggregator;
pub mod heatmap;
pub mod statistic;

pub use aggregator::Aggregator;
pub use heatmap::{classify, Bucket, HeatMap};
pub use statistic::{Statistic, StatisticKind, StatisticSet};
