//! Climate report runner.
//!
//! Usage: `climon_service [config.toml]` (defaults to `./climon.toml`).
//!
//! Loads the dataset, runs every transform per data type, and prints a
//! plain-text report.

use std::path::PathBuf;

use chrono::Local;

use climon_service::analysis::{compute_trends, detect_anomalies, forecast_linear, group_by_type, moving_average};
use climon_service::config::{load_config, Config};
use climon_service::datatypes;
use climon_service::ingest::{load_dataset, SourceKind};
use climon_service::logging::{self, Component};
use climon_service::model::{Column, TimeSeriesTable};
use climon_service::summary::{forecast_envelope, summarize};

const DEFAULT_CONFIG_PATH: &str = "climon.toml";

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    // validate() has already checked the level string.
    let level = config.logging.min_level().unwrap_or(logging::LogLevel::Info);
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);

    let today = Local::now().date_naive();
    let (dataset, source) = load_dataset(&config, today);

    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 CLIMATE REPORT ({})", match source {
        SourceKind::Noaa => "NOAA CDO",
        SourceKind::Synthetic => "synthetic data",
    });
    println!("═══════════════════════════════════════════════════════════");

    let groups = group_by_type(&dataset);
    if groups.is_empty() {
        logging::warn(Component::System, None, "dataset is empty; nothing to report");
    }

    for (data_type, table) in &groups {
        report_type(&config, data_type, table);
    }

    println!("═══════════════════════════════════════════════════════════");
}

fn report_type(config: &Config, data_type: &str, table: &TimeSeriesTable) {
    let analysis = &config.analysis;

    println!("\n{} ({})", datatypes::title_for(data_type), data_type);
    println!("  Unit: {}", datatypes::axis_label_for(data_type));
    println!("  Records: {}", table.len());

    match summarize(table) {
        Some(insights) => {
            println!("  Mean: {:.2}", insights.mean);
            println!("  Min:  {:.2} ({})", insights.min.value, format_date(insights.min.date));
            println!("  Max:  {:.2} ({})", insights.max.value, format_date(insights.max.date));
            println!("  Yearly trend: {}", insights.trend_label());
        }
        None => println!("  No values available"),
    }

    let smoothed = moving_average(table, analysis.window_size);
    if let Some(latest) = smoothed.iter().rev().find_map(|r| r.moving_avg) {
        println!("  Latest {}-record moving average: {:.2}", analysis.window_size, latest);
    }

    let flagged = detect_anomalies(table, Column::Value, analysis.anomaly_threshold);
    let anomalies: Vec<_> = flagged.iter().filter(|r| r.is_anomaly == Some(true)).collect();
    println!("  Anomalies (|z| > {}): {}", analysis.anomaly_threshold, anomalies.len());
    for record in anomalies {
        println!(
            "    - {} value={:.2} z={:.2}",
            format_date(record.date),
            record.value.unwrap_or(f64::NAN),
            record.z_score.unwrap_or(f64::NAN)
        );
    }

    if let Some(report) = compute_trends(table, Column::Value, &analysis.periods) {
        for period in &report.periods {
            let change = match period.change_percent {
                Some(change) => change
                    .value()
                    .map(|v| format!("{:+.2}%", v))
                    .unwrap_or_else(|| "undefined".to_string()),
                None => "n/a".to_string(),
            };
            println!("  {} ({} buckets): {}", period.name, period.buckets.len(), change);
        }
    }

    let forecast = forecast_linear(table, Column::Value, analysis.forecast_days);
    if let Some(last) = forecast_envelope(&forecast, analysis.envelope_fraction).last() {
        println!(
            "  Forecast {}: {:.2} [{:.2} .. {:.2}]",
            last.date.format("%d.%m.%Y"),
            last.point,
            last.lower,
            last.upper
        );
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}
