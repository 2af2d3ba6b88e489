//! Text and JSON rendering of query results.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::data::{DailyRecord, Field};
use crate::range::DatasetBounds;
use crate::stats::statistic::NO_DATA_MESSAGE;
use crate::stats::{HeatMap, StatisticSet};

/// Placeholder for a missing reading in tables
const MISSING: &str = "-";

/// Summary of the loaded dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub record_count: i64,
    pub bounds: DatasetBounds,
    pub regions: Vec<String>,
}

fn cell(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

pub fn info(info: &DatasetInfo, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(info),
        OutputFormat::Text => Ok(format!(
            "records: {}\nfirst date: {}\nlast date: {}\nregions ({}): {}",
            info.record_count,
            info.bounds.first,
            info.bounds.last,
            info.regions.len(),
            info.regions.join(", ")
        )),
    }
}

/// A single optional number, labelled
pub fn value(label: &str, value: Option<i64>, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&json!({ "name": label, "value": value }))
        }
        OutputFormat::Text => Ok(format!(
            "{label}: {}",
            value.map_or_else(|| NO_DATA_MESSAGE.to_string(), |v| v.to_string())
        )),
    }
}

pub fn statistics(set: &StatisticSet, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(set.statistics()),
        OutputFormat::Text => {
            let mut out = String::new();
            for stat in set.statistics() {
                let _ = writeln!(out, "{}: {}", stat.name(), stat.display_value());
            }
            Ok(out.trim_end().to_string())
        }
    }
}

pub fn series(
    field: Field,
    series: &BTreeMap<NaiveDate, Option<i64>>,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&json!({ "field": field, "series": series }))
        }
        OutputFormat::Text => {
            let mut out = format!("{:<12}{}\n", "Date", field.label());
            for (date, value) in series {
                let _ = writeln!(out, "{:<12}{}", date.to_string(), cell(*value));
            }
            Ok(out.trim_end().to_string())
        }
    }
}

/// Records as a table, one column per field
pub fn records(records: &[DailyRecord], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(records),
        OutputFormat::Text => {
            let mut out = String::new();
            let header: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
            let _ = writeln!(out, "{}", header.join(" | "));
            for record in records {
                let row: Vec<String> = Field::ALL
                    .iter()
                    .map(|&field| match field {
                        Field::Date => record.date.to_string(),
                        _ => cell(record.value(field)),
                    })
                    .collect();
                let _ = writeln!(out, "{}", row.join(" | "));
            }
            Ok(out.trim_end().to_string())
        }
    }
}

pub fn heatmap(map: &HeatMap, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(map),
        OutputFormat::Text => {
            let mut out = format!("{} (max {})\n", map.field.label(), cell(map.max));
            for c in &map.cells {
                let _ = writeln!(
                    out,
                    "{:<24}{:>8}  {:?} {}",
                    c.region,
                    cell(c.value),
                    c.bucket,
                    c.bucket.color_hint()
                );
            }
            Ok(out.trim_end().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{date, sample_repository};
    use crate::stats::Aggregator;

    #[test]
    fn test_value_text_and_json() {
        assert_eq!(value("Cases", Some(42), OutputFormat::Text).unwrap(), "Cases: 42");
        assert_eq!(
            value("Cases", None, OutputFormat::Text).unwrap(),
            format!("Cases: {NO_DATA_MESSAGE}")
        );

        let json: serde_json::Value =
            serde_json::from_str(&value("Cases", None, OutputFormat::Json).unwrap()).unwrap();
        assert!(json["value"].is_null());
    }

    #[test]
    fn test_series_json_keys_are_dates() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);
        let data = agg.cases_per_day(date(2023, 1, 4), date(2023, 1, 5)).unwrap();

        let out = series(Field::NewCases, &data, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["field"], "new_cases");
        assert_eq!(json["series"]["2023-01-04"], 18);
        assert!(json["series"]["2023-01-05"].is_null());
    }

    #[test]
    fn test_series_text_marks_missing() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);
        let data = agg.cases_per_day(date(2023, 1, 5), date(2023, 1, 5)).unwrap();

        let out = series(Field::NewCases, &data, OutputFormat::Text).unwrap();
        let last = out.lines().last().unwrap();
        assert!(last.starts_with("2023-01-05"));
        assert!(last.ends_with(MISSING));
    }

    #[test]
    fn test_records_table_has_header_and_rows() {
        let repo = sample_repository();
        let rows = repo
            .records_in_range(Some("Barnet"), date(2023, 1, 1), date(2023, 1, 2), Field::Date)
            .unwrap();

        let out = records(&rows, OutputFormat::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date | Retail Recreational GMR"));
        assert!(lines[1].starts_with("2023-01-01 | -20"));
    }

    #[test]
    fn test_statistics_text_lists_all() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);
        let set = StatisticSet::build(&agg, date(2023, 1, 2), date(2023, 1, 4)).unwrap();

        let out = statistics(&set, OutputFormat::Text).unwrap();
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("Average cases per day: 26"));
    }

    #[test]
    fn test_statistics_json_carries_names() {
        let repo = sample_repository();
        let agg = Aggregator::new(&repo);
        let set = StatisticSet::build(&agg, date(2023, 1, 2), date(2023, 1, 4)).unwrap();

        let out = statistics(&set, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json[0]["name"], "Total Deaths across all London boroughs");
        assert_eq!(json[0]["kind"], "total_deaths");
        assert_eq!(json[0]["data"], 6);
        assert_eq!(json[4]["name"], "Average cases per day");
    }
}
