//! Range-scoped aggregations over the repository.
//!
//! Every operation takes an inclusive `[start, end]` range. A range inverted by
//! exactly one day (`start == end + 1`) is allowed and means "no change": the
//! end reading is compared against itself.
//!
//! Missing data is `None` all the way through. Any absent operand makes the
//! derived value absent; nothing is ever zero-filled.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::data::{Field, Repository, RepositoryError};

type Result<T> = std::result::Result<T, RepositoryError>;

/// The day before `date`, or `None` at the start of the calendar
fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(1))
}

/// Every calendar day in `[start, end]`; empty when `start > end`
fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Number of calendar days in the inclusive range `[start, end]`
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Aggregation functions bound to one repository
#[derive(Clone, Copy)]
pub struct Aggregator<'a> {
    repo: &'a Repository,
}

impl<'a> Aggregator<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Aggregator { repo }
    }

    /// The repository this aggregator reads from
    pub fn repository(&self) -> &'a Repository {
        self.repo
    }

    /// Change in a cumulative field over `[start, end]`: `value(end) - value(start - 1)`.
    ///
    /// Without a region, `value` is the null-skipping sum across all regions on
    /// that date.
    pub fn delta(
        &self,
        field: Field,
        start: NaiveDate,
        end: NaiveDate,
        region: Option<&str>,
    ) -> Result<Option<i64>> {
        let Some(before) = previous_day(start) else {
            return Ok(None);
        };

        let end_value = self.repo.field_value(field, end, region)?;
        let start_value = self.repo.field_value(field, before, region)?;

        let delta = end_value.zip(start_value).map(|(e, s)| e - s);
        debug!(%field, %start, %end, ?region, ?delta, "delta");
        Ok(delta)
    }

    /// Largest per-region change over `[start, end]`.
    ///
    /// Each region is compared only against itself; regions missing either
    /// endpoint are dropped. `None` when no region has both readings.
    pub fn max_delta(&self, field: Field, start: NaiveDate, end: NaiveDate) -> Result<Option<i64>> {
        let Some(before) = previous_day(start) else {
            return Ok(None);
        };

        let end_values = self.repo.region_values(field, end)?;
        let start_values = self.repo.region_values(field, before)?;

        let max = end_values
            .into_iter()
            .filter_map(|(region, end_value)| {
                let start_value = start_values.get(&region).copied().flatten();
                end_value.zip(start_value).map(|(e, s)| e - s)
            })
            .max();

        debug!(%field, %start, %end, ?max, "max_delta");
        Ok(max)
    }

    /// Sum of `field` across regions for each day in `[start, end]`.
    ///
    /// The map has exactly one entry per calendar day. Days where no region
    /// reported map to `None`.
    pub fn grouped_sum(
        &self,
        field: Field,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Option<i64>>> {
        let sums = self.repo.daily_sums(field, start, end)?;

        let series = days_between(start, end)
            .map(|day| (day, sums.get(&day).copied().flatten()))
            .collect();
        Ok(series)
    }

    /// Mean of every present reading of `field` across all regions and days in
    /// `[start, end]`, truncated toward zero.
    pub fn average(&self, field: Field, start: NaiveDate, end: NaiveDate) -> Result<Option<i64>> {
        let (sum, count) = self.repo.sum_and_count(field, start, end)?;

        let average = (count > 0).then(|| sum / count);
        debug!(%field, %start, %end, ?average, "average");
        Ok(average)
    }

    /// New cases across all boroughs, or in one borough
    pub fn cases(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        region: Option<&str>,
    ) -> Result<Option<i64>> {
        self.delta(Field::TotalCases, start, end, region)
    }

    /// Deaths across all boroughs, or in one borough
    pub fn deaths(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        region: Option<&str>,
    ) -> Result<Option<i64>> {
        self.delta(Field::TotalDeaths, start, end, region)
    }

    /// Largest case increase seen by any single borough
    pub fn max_cases(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<i64>> {
        self.max_delta(Field::TotalCases, start, end)
    }

    /// Largest death increase seen by any single borough
    pub fn max_deaths(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<i64>> {
        self.max_delta(Field::TotalDeaths, start, end)
    }

    pub fn cases_per_day(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Option<i64>>> {
        self.grouped_sum(Field::NewCases, start, end)
    }

    pub fn deaths_per_day(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Option<i64>>> {
        self.grouped_sum(Field::NewDeaths, start, end)
    }

    pub fn parks_gmr(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<i64>> {
        self.average(Field::ParksGmr, start, end)
    }

    pub fn transit_gmr(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<i64>> {
        self.average(Field::TransitGmr, start, end)
    }
}
