//! Data source adapters.
//!
//! Each adapter returns a `TimeSeriesTable` of raw `(date, value, type)`
//! records and knows nothing about the transforms applied afterwards.
//!
//! Submodules:
//! - `noaa`      — NOAA Climate Data Online v2 client.
//! - `synthetic` — deterministic sample data for development and demos.

pub mod noaa;
pub mod synthetic;

use chrono::NaiveDate;

use crate::analysis::group_by_type;
use crate::config::Config;
use crate::logging::{self, Component};
use crate::model::{FetchError, TimeSeriesTable};

/// Where a loaded dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Noaa,
    Synthetic,
}

/// Loads the dataset for one report run.
///
/// Fetches from NOAA when the live API is enabled and a token is present;
/// otherwise, or if the fetch fails, falls back to synthetic data so the
/// run always has something to analyze.
pub fn load_dataset(config: &Config, today: NaiveDate) -> (TimeSeriesTable, SourceKind) {
    if config.live_api_enabled() {
        match fetch_live(config, today) {
            Ok(table) => {
                log_counts(Component::Noaa, &table);
                return (table, SourceKind::Noaa);
            }
            Err(e) => {
                logging::log_noaa_failure("data", "Fetch demo temperature data", &e);
                logging::warn(Component::Noaa, None, "falling back to synthetic data");
            }
        }
    } else if config.noaa.use_live_api {
        logging::warn(
            Component::Config,
            None,
            &format!("use_live_api is set but {} is empty; using synthetic data", crate::config::TOKEN_ENV_VAR),
        );
    }

    let table = synthetic::sample_data_at(today);
    log_counts(Component::Synthetic, &table);
    (table, SourceKind::Synthetic)
}

fn fetch_live(config: &Config, today: NaiveDate) -> Result<TimeSeriesTable, FetchError> {
    let client = noaa::build_client(&config.noaa)?;
    noaa::fetch_demo_temperature_data(&client, &config.noaa, today)
}

fn log_counts(component: Component, table: &TimeSeriesTable) {
    let counts: Vec<(String, usize)> = group_by_type(table)
        .into_iter()
        .map(|(data_type, group)| (data_type, group.len()))
        .collect();
    logging::log_fetch_summary(component, &counts);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_token_loads_synthetic_data() {
        let mut config = Config::default();
        config.noaa.use_live_api = true;
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let (table, source) = load_dataset(&config, today);
        assert_eq!(source, SourceKind::Synthetic);
        assert_eq!(table, synthetic::sample_data_at(today));
    }
}
