//! covid-stats: command-line front end for the COVID-19 dataset statistics.
//!
//! Opens the dataset once, answers one query and closes it again. Failing to
//! open the dataset is fatal; there is no fallback data source.

use std::io;

use anyhow::{Context, Result};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use covid_stats::cli::{AppConfig, Cli, Commands, RangeArgs};
use covid_stats::data::Repository;
use covid_stats::range::{DatasetBounds, DateRange};
use covid_stats::report::{self, DatasetInfo};
use covid_stats::stats::{Aggregator, HeatMap, StatisticSet};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(&cli);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let repo = match Repository::open(&config.db_path) {
        Ok(repo) => repo,
        Err(e) => {
            error!(path = %config.db_path.display(), "cannot open dataset: {e}");
            return Err(e).with_context(|| format!("Failed to open dataset: {:?}", config.db_path));
        }
    };

    let output = run(&repo, &cli.command, &config)?;
    println!("{output}");

    repo.close().context("Failed to close dataset")?;
    Ok(())
}

/// Check a range against the dataset unless the caller opted out
fn checked_range(repo: &Repository, range: &RangeArgs) -> Result<DateRange> {
    if range.unchecked {
        return Ok(DateRange {
            start: range.start,
            end: range.end,
        });
    }
    let bounds = DatasetBounds::from_repository(repo)?;
    Ok(DateRange::select(range.start, range.end, &bounds)?)
}

fn run(repo: &Repository, command: &Commands, config: &AppConfig) -> Result<String> {
    let agg = Aggregator::new(repo);
    let format = config.format;
    debug!(?command, "running");

    let output = match command {
        Commands::Info => {
            let info = DatasetInfo {
                record_count: repo.record_count()?,
                bounds: DatasetBounds::from_repository(repo)?,
                regions: repo.regions()?,
            };
            report::info(&info, format)?
        }
        Commands::Statistics { range } => {
            let range = checked_range(repo, range)?;
            let set = StatisticSet::build(&agg, range.start, range.end)?;
            report::statistics(&set, format)?
        }
        Commands::Delta {
            field,
            range,
            region,
        } => {
            let range = checked_range(repo, range)?;
            let value = agg.delta(*field, range.start, range.end, region.as_deref())?;
            let label = match region {
                Some(region) => format!("{} change in {region}", field.label()),
                None => format!("{} change", field.label()),
            };
            report::value(&label, value, format)?
        }
        Commands::MaxDelta { field, range } => {
            let range = checked_range(repo, range)?;
            let value = agg.max_delta(*field, range.start, range.end)?;
            let label = format!("Largest {} change in one borough", field.label());
            report::value(&label, value, format)?
        }
        Commands::Series { field, range } => {
            let range = checked_range(repo, range)?;
            let series = agg.grouped_sum(*field, range.start, range.end)?;
            report::series(*field, &series, format)?
        }
        Commands::Average { field, range } => {
            let range = checked_range(repo, range)?;
            let value = agg.average(*field, range.start, range.end)?;
            report::value(&format!("Average {}", field.label()), value, format)?
        }
        Commands::Records {
            region,
            range,
            order_by,
        } => {
            let range = checked_range(repo, range)?;
            let records =
                repo.records_in_range(Some(region.as_str()), range.start, range.end, *order_by)?;
            report::records(&records, format)?
        }
        Commands::Heatmap { field, range } => {
            let range = checked_range(repo, range)?;
            let map = HeatMap::build(&agg, *field, range.start, range.end)?;
            report::heatmap(&map, format)?
        }
    };

    Ok(output)
}
