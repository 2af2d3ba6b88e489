//! In-memory dataset shared by the unit tests.
//!
//! Three boroughs over 2023-01-01..=2023-01-05 with deliberate reporting gaps:
//!
//! | date  | Barnet cases | Camden cases | Sutton cases | new cases sum |
//! |-------|--------------|--------------|--------------|---------------|
//! | 01-01 | 200          | 300          | 50           | 32            |
//! | 01-02 | 205          | 310          | 52           | 17            |
//! | 01-03 | 215          | -            | 57           | 15            |
//! | 01-04 | 230          | 340          | 60           | 18            |
//! | 01-05 | 240          | -            | 61           | -             |

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::Repository;

const SCHEMA: &str = "CREATE TABLE CovidData (
    `Date` TEXT NOT NULL,
    Borough TEXT NOT NULL,
    RetailRecreationalGMR INTEGER,
    GroceryPharmacyGMR INTEGER,
    ParksGMR INTEGER,
    TransitGMR INTEGER,
    WorkplacesGMR INTEGER,
    ResidentialGMR INTEGER,
    NewCases INTEGER,
    TotalCases INTEGER,
    NewDeaths INTEGER,
    TotalDeaths INTEGER,
    PRIMARY KEY (`Date`, Borough)
)";

/// (day of January, borough, retail, grocery, parks, transit, workplaces,
/// residential, new cases, total cases, new deaths, total deaths)
type Row = (
    u32,
    &'static str,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
);

const ROWS: [Row; 15] = [
    (
        1,
        "Barnet",
        Some(-20),
        Some(-13),
        Some(12),
        Some(-30),
        Some(-14),
        Some(-1),
        Some(10),
        Some(200),
        Some(0),
        Some(10),
    ),
    (
        1,
        "Camden",
        None,
        None,
        Some(-3),
        Some(-35),
        None,
        None,
        Some(20),
        Some(300),
        Some(1),
        Some(20),
    ),
    (1, "Sutton", None, None, None, Some(-21), None, None, Some(2), Some(50), Some(0), Some(5)),
    (2, "Barnet", None, None, Some(7), None, None, None, Some(5), Some(205), Some(0), Some(10)),
    (2, "Camden", None, None, None, None, None, None, Some(10), Some(310), Some(1), Some(21)),
    (2, "Sutton", None, None, None, None, None, None, Some(2), Some(52), Some(0), Some(5)),
    (3, "Barnet", None, None, None, None, None, None, Some(10), Some(215), Some(1), Some(11)),
    (3, "Camden", None, None, None, None, None, None, None, None, Some(0), Some(21)),
    (3, "Sutton", None, None, None, None, None, None, Some(5), Some(57), Some(0), Some(5)),
    (4, "Barnet", None, None, None, None, None, None, Some(15), Some(230), Some(1), Some(12)),
    (4, "Camden", None, None, None, None, None, None, None, Some(340), Some(2), Some(23)),
    (4, "Sutton", None, None, Some(20), None, None, None, Some(3), Some(60), Some(1), Some(6)),
    (5, "Barnet", None, None, None, None, None, None, None, Some(240), Some(0), Some(12)),
    (5, "Camden", None, None, None, None, None, None, None, None, None, None),
    (5, "Sutton", None, None, None, None, None, None, None, Some(61), Some(0), Some(6)),
];

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn empty_repository() -> Repository {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute(SCHEMA, []).unwrap();
    Repository::from_connection(conn)
}

pub fn sample_repository() -> Repository {
    let conn = Connection::open_in_memory().unwrap();
    populate(&conn);
    Repository::from_connection(conn)
}

/// Write the sample dataset to a database file at `path`
pub fn write_sample_db(path: &Path) {
    let conn = Connection::open(path).unwrap();
    populate(&conn);
    conn.close().unwrap();
}

fn populate(conn: &Connection) {
    conn.execute(SCHEMA, []).unwrap();

    for (day, borough, retail, grocery, parks, transit, work, home, nc, tc, nd, td) in ROWS {
        conn.execute(
            "INSERT INTO CovidData VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                date(2023, 1, day),
                borough,
                retail,
                grocery,
                parks,
                transit,
                work,
                home,
                nc,
                tc,
                nd,
                td
            ],
        )
        .unwrap();
    }
}
