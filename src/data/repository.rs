//! SQLite repository for reading the pre-loaded COVID dataset.
//!
//! Database schema:
//! - One `CovidData` table keyed by (`Date`, `Borough`)
//! - Six nullable mobility columns (`*GMR`) and four nullable case/death columns
//!
//! The repository is read-only. A missing row is reported as `None`, never as
//! an error: absence means "not measured".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use thiserror::Error;
use tracing::{debug, info};

use super::models::{DailyRecord, Field};

/// Columns selected for a full record, in the order `record_from_row` reads them
const RECORD_COLUMNS: &str = "`Date`, Borough, RetailRecreationalGMR, GroceryPharmacyGMR, \
     ParksGMR, TransitGMR, WorkplacesGMR, ResidentialGMR, \
     NewCases, TotalCases, NewDeaths, TotalDeaths";

/// Errors raised by the repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database not found: {0:?}")]
    NotFound(PathBuf),

    #[error("field {0:?} has no integer readings")]
    NotNumeric(Field),

    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Map one `RECORD_COLUMNS` row into a record
fn record_from_row(row: &Row) -> rusqlite::Result<DailyRecord> {
    Ok(DailyRecord {
        date: row.get(0)?,
        region: row.get(1)?,
        retail_recreation_gmr: row.get(2)?,
        grocery_pharmacy_gmr: row.get(3)?,
        parks_gmr: row.get(4)?,
        transit_gmr: row.get(5)?,
        workplaces_gmr: row.get(6)?,
        residential_gmr: row.get(7)?,
        new_cases: row.get(8)?,
        total_cases: row.get(9)?,
        new_deaths: row.get(10)?,
        total_deaths: row.get(11)?,
    })
}

/// Reject fields that cannot be summed or subtracted
fn numeric_column(field: Field) -> Result<&'static str> {
    if field.is_numeric() {
        Ok(field.column())
    } else {
        Err(RepositoryError::NotNumeric(field))
    }
}

/// Read-only handle on the dataset.
///
/// Owns the single connection to the backing store. `Connection` is not
/// `Sync`, so callers that want to share a repository between threads must
/// wrap it in a lock; one query runs at a time.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Open a read-only connection to the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RepositoryError::NotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        info!(path = %path.display(), "opened dataset");
        Ok(Repository { conn })
    }

    /// Wrap an already open connection (e.g. an in-memory database)
    pub fn from_connection(conn: Connection) -> Self {
        Repository { conn }
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| RepositoryError::Sqlite(e))?;
        info!("closed dataset");
        Ok(())
    }

    /// Total number of rows
    pub fn record_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM CovidData", [], |row| row.get(0))?;
        Ok(count)
    }

    /// First date present in the dataset
    pub fn earliest_date(&self) -> Result<NaiveDate> {
        self.date_bound("MIN")
    }

    /// Last date present in the dataset
    pub fn latest_date(&self) -> Result<NaiveDate> {
        self.date_bound("MAX")
    }

    fn date_bound(&self, aggregate: &str) -> Result<NaiveDate> {
        let sql = format!("SELECT {aggregate}(`Date`) FROM CovidData");
        let date: Option<NaiveDate> = self.conn.query_row(&sql, [], |row| row.get(0))?;
        date.ok_or(RepositoryError::EmptyDataset)
    }

    /// Distinct region identifiers, sorted
    pub fn regions(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT Borough FROM CovidData ORDER BY Borough")?;
        let regions = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(regions)
    }

    /// All records with `start <= date <= end`, optionally for one region only.
    ///
    /// Rows are sorted ascending by `order_by`; ties fall back to date, then region.
    pub fn records_in_range(
        &self,
        region: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
        order_by: Field,
    ) -> Result<Vec<DailyRecord>> {
        let order = order_by.column();
        debug!(?region, %start, %end, %order_by, "records_in_range");

        let records = match region {
            Some(region) => {
                let sql = format!(
                    "SELECT {RECORD_COLUMNS} FROM CovidData \
                     WHERE Borough = ?1 AND `Date` BETWEEN ?2 AND ?3 \
                     ORDER BY {order}, `Date`, Borough"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![region, start, end], record_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {RECORD_COLUMNS} FROM CovidData \
                     WHERE `Date` BETWEEN ?1 AND ?2 \
                     ORDER BY {order}, `Date`, Borough"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![start, end], record_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(records)
    }

    /// Point lookup of one field on one date.
    ///
    /// With a region this is that region's reading. Without one it is the
    /// null-skipping sum across every region reporting on `date`: `None` only
    /// when no region has a value.
    pub fn field_value(
        &self,
        field: Field,
        date: NaiveDate,
        region: Option<&str>,
    ) -> Result<Option<i64>> {
        let column = numeric_column(field)?;

        let value = match region {
            Some(region) => {
                let sql = format!(
                    "SELECT {column} FROM CovidData WHERE Borough = ?1 AND `Date` = ?2"
                );
                self.conn
                    .query_row(&sql, params![region, date], |row| row.get::<_, Option<i64>>(0))
                    .optional()?
                    .flatten()
            }
            None => {
                let sql = format!("SELECT SUM({column}) FROM CovidData WHERE `Date` = ?1");
                self.conn
                    .query_row(&sql, params![date], |row| row.get::<_, Option<i64>>(0))?
            }
        };

        debug!(%field, %date, ?region, ?value, "field_value");
        Ok(value)
    }

    /// Each region's reading of `field` on `date`.
    ///
    /// Regions without a row on that date are missing from the map; regions
    /// with a row but no reading map to `None`.
    pub fn region_values(
        &self,
        field: Field,
        date: NaiveDate,
    ) -> Result<BTreeMap<String, Option<i64>>> {
        let column = numeric_column(field)?;
        let sql = format!("SELECT Borough, {column} FROM CovidData WHERE `Date` = ?1");

        let mut stmt = self.conn.prepare(&sql)?;
        let values = stmt
            .query_map(params![date], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<String, Option<i64>>>>()?;
        Ok(values)
    }

    /// Per-date sums of `field` for dates in `[start, end]` that have rows.
    ///
    /// Dates with no rows at all are absent from the map; filling those in is
    /// the aggregator's job.
    pub fn daily_sums(
        &self,
        field: Field,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Option<i64>>> {
        let column = numeric_column(field)?;
        let sql = format!(
            "SELECT `Date`, SUM({column}) FROM CovidData \
             WHERE `Date` BETWEEN ?1 AND ?2 GROUP BY `Date`"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let sums = stmt
            .query_map(params![start, end], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<NaiveDate, Option<i64>>>>()?;
        debug!(%field, %start, %end, days = sums.len(), "daily_sums");
        Ok(sums)
    }

    /// Sum and count of the present readings of `field` across all regions in `[start, end]`
    pub fn sum_and_count(
        &self,
        field: Field,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(i64, i64)> {
        let column = numeric_column(field)?;
        let sql = format!(
            "SELECT COALESCE(SUM({column}), 0), COUNT({column}) FROM CovidData \
             WHERE `Date` BETWEEN ?1 AND ?2"
        );

        let (sum, count): (i64, i64) = self
            .conn
            .query_row(&sql, params![start, end], |row| Ok((row.get(0)?, row.get(1)?)))?;
        debug!(%field, %start, %end, sum, count, "sum_and_count");
        Ok((sum, count))
    }
}
