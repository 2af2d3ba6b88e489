//! Data models representing the per-borough daily dataset.

use chrono::NaiveDate;
use serde::Serialize;

/// Number of administrative areas in the dataset (32 London boroughs plus the City)
pub const REGION_COUNT: i64 = 33;

/// A queryable column of the `CovidData` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    RetailRecreationGmr,
    GroceryPharmacyGmr,
    ParksGmr,
    TransitGmr,
    WorkplacesGmr,
    ResidentialGmr,
    NewCases,
    TotalCases,
    NewDeaths,
    TotalDeaths,
}

impl Field {
    /// Every field, in table column order
    pub const ALL: [Field; 11] = [
        Field::Date,
        Field::RetailRecreationGmr,
        Field::GroceryPharmacyGmr,
        Field::ParksGmr,
        Field::TransitGmr,
        Field::WorkplacesGmr,
        Field::ResidentialGmr,
        Field::NewCases,
        Field::TotalCases,
        Field::NewDeaths,
        Field::TotalDeaths,
    ];

    /// Column name in the backing table. Queries take identifiers only from here.
    pub fn column(self) -> &'static str {
        match self {
            Field::Date => "`Date`",
            Field::RetailRecreationGmr => "RetailRecreationalGMR",
            Field::GroceryPharmacyGmr => "GroceryPharmacyGMR",
            Field::ParksGmr => "ParksGMR",
            Field::TransitGmr => "TransitGMR",
            Field::WorkplacesGmr => "WorkplacesGMR",
            Field::ResidentialGmr => "ResidentialGMR",
            Field::NewCases => "NewCases",
            Field::TotalCases => "TotalCases",
            Field::NewDeaths => "NewDeaths",
            Field::TotalDeaths => "TotalDeaths",
        }
    }

    /// Human-readable column heading
    pub fn label(self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::RetailRecreationGmr => "Retail Recreational GMR",
            Field::GroceryPharmacyGmr => "Grocery Pharmacy GMR",
            Field::ParksGmr => "Parks GMR",
            Field::TransitGmr => "Transit GMR",
            Field::WorkplacesGmr => "Workplaces GMR",
            Field::ResidentialGmr => "Residential GMR",
            Field::NewCases => "New Cases",
            Field::TotalCases => "Total Cases",
            Field::NewDeaths => "New Deaths",
            Field::TotalDeaths => "Total Deaths",
        }
    }

    /// Everything except the date holds an integer reading
    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::Date)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the dataset: a single borough on a single day.
///
/// Every reading is optional; `None` means the value was not reported, which
/// is not the same thing as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub region: String,
    /// Google mobility readings: percent change from the pre-pandemic baseline
    pub retail_recreation_gmr: Option<i64>,
    pub grocery_pharmacy_gmr: Option<i64>,
    pub parks_gmr: Option<i64>,
    pub transit_gmr: Option<i64>,
    pub workplaces_gmr: Option<i64>,
    pub residential_gmr: Option<i64>,
    pub new_cases: Option<i64>,
    pub total_cases: Option<i64>,
    pub new_deaths: Option<i64>,
    pub total_deaths: Option<i64>,
}

impl DailyRecord {
    /// Reading for a numeric field; `Field::Date` has no integer reading
    pub fn value(&self, field: Field) -> Option<i64> {
        match field {
            Field::Date => None,
            Field::RetailRecreationGmr => self.retail_recreation_gmr,
            Field::GroceryPharmacyGmr => self.grocery_pharmacy_gmr,
            Field::ParksGmr => self.parks_gmr,
            Field::TransitGmr => self.transit_gmr,
            Field::WorkplacesGmr => self.workplaces_gmr,
            Field::ResidentialGmr => self.residential_gmr,
            Field::NewCases => self.new_cases,
            Field::TotalCases => self.total_cases,
            Field::NewDeaths => self.new_deaths,
            Field::TotalDeaths => self.total_deaths,
        }
    }
}
