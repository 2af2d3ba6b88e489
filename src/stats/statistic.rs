//! Named statistics shown for a selected date range.
//!
//! Each statistic is computed once, when it is built, and never again. A new
//! range selection builds a new set.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregator::{inclusive_days, Aggregator};
use crate::data::{RepositoryError, REGION_COUNT};

/// Shown in place of a value when the range lacks the data to compute it
pub const NO_DATA_MESSAGE: &str =
    "Sufficient data to calculate this statistic is unavailable over the selected period";

/// The fixed set of statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    TotalDeaths,
    ParksGmrAverage,
    TransitGmrAverage,
    TotalCasesPerBorough,
    TotalCasesPerDay,
}

impl StatisticKind {
    /// Every statistic, in display order
    pub const ALL: [StatisticKind; 5] = [
        StatisticKind::TotalDeaths,
        StatisticKind::ParksGmrAverage,
        StatisticKind::TransitGmrAverage,
        StatisticKind::TotalCasesPerBorough,
        StatisticKind::TotalCasesPerDay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatisticKind::TotalDeaths => "Total Deaths across all London boroughs",
            StatisticKind::ParksGmrAverage => "Percent change in visits to parks",
            StatisticKind::TransitGmrAverage => "Percent change in visits to public transport hubs",
            StatisticKind::TotalCasesPerBorough => "Average cases per borough",
            StatisticKind::TotalCasesPerDay => "Average cases per day",
        }
    }

    /// Run the aggregation behind this statistic
    fn calculate(
        self,
        agg: &Aggregator<'_>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<i64>, RepositoryError> {
        let value = match self {
            StatisticKind::TotalDeaths => agg.deaths(start, end, None)?,
            StatisticKind::ParksGmrAverage => agg.parks_gmr(start, end)?,
            StatisticKind::TransitGmrAverage => agg.transit_gmr(start, end)?,
            StatisticKind::TotalCasesPerBorough => {
                agg.cases(start, end, None)?.map(|cases| cases / REGION_COUNT)
            }
            StatisticKind::TotalCasesPerDay => {
                // A one-day inverted range spans zero days
                let days = inclusive_days(start, end).max(1);
                agg.cases(start, end, None)?.map(|cases| cases / days)
            }
        };
        Ok(value)
    }
}

/// A statistic evaluated over a fixed date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistic {
    kind: StatisticKind,
    name: &'static str,
    start: NaiveDate,
    end: NaiveDate,
    data: Option<i64>,
}

impl Statistic {
    /// Compute `kind` over `[start, end]`. Missing data yields a statistic with no value.
    pub fn new(
        kind: StatisticKind,
        agg: &Aggregator<'_>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, RepositoryError> {
        let data = kind.calculate(agg, start, end)?;
        Ok(Statistic {
            kind,
            name: kind.label(),
            start,
            end,
            data,
        })
    }

    pub fn kind(&self) -> StatisticKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn data(&self) -> Option<i64> {
        self.data
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// The value as display text, or the no-data message
    pub fn display_value(&self) -> String {
        match self.data {
            Some(value) => value.to_string(),
            None => NO_DATA_MESSAGE.to_string(),
        }
    }
}

/// All statistics for one range, with a wrapping cursor over them
#[derive(Debug, Clone)]
pub struct StatisticSet {
    statistics: Vec<Statistic>,
    current: usize,
}

impl StatisticSet {
    /// Build every statistic in `StatisticKind::ALL` over `[start, end]`
    pub fn build(
        agg: &Aggregator<'_>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, RepositoryError> {
        let statistics = StatisticKind::ALL
            .into_iter()
            .map(|kind| Statistic::new(kind, agg, start, end))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatisticSet {
            statistics,
            current: 0,
        })
    }

    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    pub fn current(&self) -> &Statistic {
        &self.statistics[self.current]
    }

    /// Advance to the next statistic, wrapping to the first
    pub fn next(&mut self) -> &Statistic {
        self.current = (self.current + 1) % self.statistics.len();
        self.current()
    }

    /// Step back to the previous statistic, wrapping to the last
    pub fn previous(&mut self) -> &Statistic {
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.statistics.len() - 1);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{date, sample_repository};

    #[test]
    fn test_statistics_over_range() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);
        let set = StatisticSet::build(&agg, date(2023, 1, 2), date(2023, 1, 4)).unwrap();

        let values: Vec<(StatisticKind, Option<i64>)> = set
            .statistics()
            .iter()
            .map(|s| (s.kind(), s.data()))
            .collect();

        assert_eq!(
            values,
            vec![
                (StatisticKind::TotalDeaths, Some(6)),
                // (7 + 20) / 2
                (StatisticKind::ParksGmrAverage, Some(13)),
                (StatisticKind::TransitGmrAverage, None),
                // 80 / 33
                (StatisticKind::TotalCasesPerBorough, Some(2)),
                // 80 / 3
                (StatisticKind::TotalCasesPerDay, Some(26)),
            ]
        );
    }

    #[test]
    fn test_absent_delta_propagates_through_division() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);

        let per_borough = Statistic::new(
            StatisticKind::TotalCasesPerBorough,
            &agg,
            date(2023, 1, 1),
            date(2023, 1, 1),
        )
        .unwrap();
        assert_eq!(per_borough.data(), None);
        assert_eq!(per_borough.display_value(), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_per_day_on_inverted_range() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);

        let per_day = Statistic::new(
            StatisticKind::TotalCasesPerDay,
            &agg,
            date(2023, 1, 3),
            date(2023, 1, 2),
        )
        .unwrap();
        assert_eq!(per_day.data(), Some(0));
    }

    #[test]
    fn test_name_and_range() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);

        let stat = Statistic::new(
            StatisticKind::TotalDeaths,
            &agg,
            date(2023, 1, 2),
            date(2023, 1, 4),
        )
        .unwrap();
        assert_eq!(stat.name(), "Total Deaths across all London boroughs");
        assert_eq!(stat.range(), (date(2023, 1, 2), date(2023, 1, 4)));
        assert_eq!(stat.display_value(), "6");
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);
        let mut set = StatisticSet::build(&agg, date(2023, 1, 2), date(2023, 1, 4)).unwrap();

        assert_eq!(set.current().kind(), StatisticKind::TotalDeaths);
        assert_eq!(set.previous().kind(), StatisticKind::TotalCasesPerDay);
        assert_eq!(set.next().kind(), StatisticKind::TotalDeaths);
        assert_eq!(set.next().kind(), StatisticKind::ParksGmrAverage);
    }
}
