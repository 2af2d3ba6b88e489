//! Command-line interface argument parsing for covid-stats.
//!
//! Every query command takes a date range:
//! - `covid-stats statistics --start 2023-01-01 --end 2023-02-01`
//! - `covid-stats delta --field total-cases --start 2023-01-01 --end 2023-02-01 --region Sutton`
//! - `covid-stats heatmap --start 2022-03-01 --end 2022-03-31`

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::Field;

/// Name of the dataset file looked up in the working directory
pub const DEFAULT_DB_FILE: &str = "CovidData.db";

/// Environment variable overriding the database location
pub const DB_ENV_VAR: &str = "COVID_STATS_DB";

/// Range-scoped statistics over the London COVID-19 dataset.
#[derive(Parser, Debug)]
#[command(name = "covid-stats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the dataset's SQLite file
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inclusive date range shared by the query commands
#[derive(Args, Debug, Clone, Copy)]
pub struct RangeArgs {
    /// First day of the range (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: NaiveDate,

    /// Skip the check against the dataset's bounds and ordering
    #[arg(long)]
    pub unchecked: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record count, date bounds and regions of the dataset
    Info,

    /// The five summary statistics for a range
    Statistics {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Change in a cumulative field over a range
    Delta {
        #[arg(short, long, value_enum, default_value = "total-cases")]
        field: Field,

        #[command(flatten)]
        range: RangeArgs,

        /// Restrict to one borough; all boroughs are summed otherwise
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Largest change seen by any single borough
    MaxDelta {
        #[arg(short, long, value_enum, default_value = "total-cases")]
        field: Field,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Cross-borough sum for every day in a range
    Series {
        #[arg(short, long, value_enum, default_value = "new-cases")]
        field: Field,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Mean of a field over all boroughs and days in a range
    Average {
        #[arg(short, long, value_enum, default_value = "parks-gmr")]
        field: Field,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Full records for one borough
    Records {
        #[arg(short, long)]
        region: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Column to sort by (ascending)
        #[arg(short, long, value_enum, default_value = "date")]
        order_by: Field,
    },

    /// Heat-map bucket for every borough
    Heatmap {
        #[arg(short, long, value_enum, default_value = "total-deaths")]
        field: Field,

        #[command(flatten)]
        range: RangeArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub format: OutputFormat,
    pub log_level: &'static str,
}

impl AppConfig {
    /// Resolve configuration from parsed arguments and the environment
    pub fn from_cli(cli: &Cli) -> Self {
        let env_path = std::env::var(DB_ENV_VAR).ok();
        AppConfig {
            db_path: resolve_db_path(cli.db_path.clone(), env_path),
            format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            log_level: match cli.verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            },
        }
    }
}

/// Pick the database file: explicit flag, then environment, then the working
/// directory, then the per-user data directory.
fn resolve_db_path(flag: Option<String>, env: Option<String>) -> PathBuf {
    if let Some(path) = flag.or(env) {
        return PathBuf::from(path);
    }

    let local = PathBuf::from(DEFAULT_DB_FILE);
    if local.exists() {
        return local;
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("covid-stats")
        .join(DEFAULT_DB_FILE)
}
