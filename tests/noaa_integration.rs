//! Live NOAA Climate Data Online tests
//!
//! These tests call the real CDO API and need a token. They are marked
//! #[ignore] so they don't run during normal CI builds.
//!
//! Prerequisites:
//! - NOAA_TOKEN set in the environment or .env
//!   (request one at https://www.ncdc.noaa.gov/cdo-web/token)
//! - Internet connectivity
//!
//! Run with: cargo test --test noaa_integration -- --ignored --test-threads=1
//!
//! The CDO API allows 5 requests per second; running in parallel may hit
//! HTTP 429.

use chrono::{Duration, Local};

use climon_service::config::{load_config, Config};
use climon_service::ingest::noaa::{self, DataQuery};
use std::path::Path;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn live_config() -> Config {
    let config = load_config(Path::new("climon.toml")).expect("config should load");
    if config.noaa.token.is_none() {
        panic!("NOAA_TOKEN must be set to run live NOAA tests");
    }
    config
}

fn client(config: &Config) -> reqwest::blocking::Client {
    noaa::build_client(&config.noaa).expect("client should build")
}

// ---------------------------------------------------------------------------
// Metadata endpoints
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_datatypes_include_tavg_and_prcp() {
    let config = live_config();
    let types = noaa::fetch_data_types(&client(&config), &config.noaa, 1000, 1)
        .expect("datatypes endpoint should respond");
    let ids: Vec<_> = types.iter().map(|t| t.id.as_str()).collect();
    assert!(ids.contains(&"TAVG"), "TAVG missing from CDO datatypes");
    assert!(ids.contains(&"PRCP"), "PRCP missing from CDO datatypes");
}

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_city_locations_are_listed() {
    let config = live_config();
    let locations = noaa::fetch_locations(&client(&config), &config.noaa, Some("CITY"), 25, 1)
        .expect("locations endpoint should respond");
    assert!(!locations.is_empty(), "expected at least one CITY location");
    assert!(locations.iter().all(|l| l.id.starts_with("CITY:")));
}

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_location_categories_and_stations_respond() {
    let config = live_config();
    let http = client(&config);
    let categories = noaa::fetch_location_categories(&http, &config.noaa, 100, 1)
        .expect("locationcategories endpoint should respond");
    assert!(categories.iter().any(|c| c.id == "CITY"));

    let stations = noaa::fetch_stations(&http, &config.noaa, 5, 1)
        .expect("stations endpoint should respond");
    assert_eq!(stations.len(), 5);
}

// ---------------------------------------------------------------------------
// Data endpoint
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_recent_tavg_for_configured_location() {
    let config = live_config();
    // GHCND lags by a few days; a 60-day window ending a week ago is safe.
    let end = Local::now().date_naive() - Duration::days(7);
    let mut query = DataQuery::new(&config.noaa.dataset_id, end - Duration::days(60), end);
    query.location_id = Some(config.noaa.location_id.clone());
    query.data_type_id = Some("TAVG".to_string());

    let table = noaa::fetch_data(&client(&config), &config.noaa, &query)
        .expect("data endpoint should return TAVG observations");
    assert!(table.iter().all(|r| r.data_type.as_deref() == Some("TAVG")));
    assert!(table.iter().all(|r| r.date.is_some()), "CDO dates should always parse");
}
