//! NOAA Climate Data Online (CDO) v2 API Client
//!
//! Retrieves daily climate observations (GHCND dataset) and the metadata
//! endpoints needed to pick stations, locations and data types.
//!
//! API Documentation: https://www.ncdc.noaa.gov/cdo-web/webservices/v2
//! Requests require a free token passed in the `token` header.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::config::NoaaConfig;
use crate::logging::{self, Component};
use crate::model::{FetchError, TimeSeriesRecord, TimeSeriesTable};

pub const CDO_BASE_URL: &str = "https://www.ncdc.noaa.gov/cdo-web/api/v2/";

/// Largest page the CDO API will return.
pub const MAX_LIMIT: u32 = 1000;

// ============================================================================
// CDO API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ResultSet {
    pub offset: u32,
    pub count: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub resultset: Option<ResultSet>,
}

/// Envelope shared by every CDO list endpoint. `results` is absent, not
/// empty, when a query matches nothing.
#[derive(Debug, Deserialize)]
pub struct CdoResponse<T> {
    pub metadata: Option<Metadata>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One observation from the `data` endpoint.
#[derive(Debug, Deserialize)]
pub struct CdoObservation {
    pub date: String,  // "2023-01-01T00:00:00"
    pub datatype: String,
    pub station: Option<String>,
    pub attributes: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CdoStation {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub mindate: Option<String>,
    pub maxdate: Option<String>,
    pub datacoverage: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CdoDataType {
    pub id: String,
    pub name: Option<String>,
    pub mindate: Option<String>,
    pub maxdate: Option<String>,
    pub datacoverage: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CdoLocationCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CdoLocation {
    pub id: String,
    pub name: String,
    pub mindate: Option<String>,
    pub maxdate: Option<String>,
    pub datacoverage: Option<f64>,
}

// ============================================================================
// Query parameters
// ============================================================================

/// Parameters for the `data` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    pub dataset_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location_id: Option<String>,
    pub station_id: Option<String>,
    pub data_type_id: Option<String>,
    pub limit: u32,
}

impl DataQuery {
    pub fn new(dataset_id: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        DataQuery {
            dataset_id: dataset_id.to_string(),
            start_date,
            end_date,
            location_id: None,
            station_id: None,
            data_type_id: None,
            limit: MAX_LIMIT,
        }
    }
}

// ============================================================================
// URL construction
// ============================================================================

fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

/// Builds a metadata list URL (`stations`, `datatypes`, `locations`, ...).
pub fn build_list_url(base_url: &str, endpoint: &str, limit: u32, offset: u32, extra: &[(&str, &str)]) -> String {
    let mut url = format!("{}?limit={}&offset={}", endpoint_url(base_url, endpoint), limit.min(MAX_LIMIT), offset);
    for (key, value) in extra {
        url.push_str(&format!("&{}={}", key, value));
    }
    url
}

/// Builds the `data` endpoint URL for `query`.
pub fn build_data_url(base_url: &str, query: &DataQuery) -> String {
    let mut url = format!(
        "{}?datasetid={}&startdate={}&enddate={}&limit={}",
        endpoint_url(base_url, "data"),
        query.dataset_id,
        query.start_date.format("%Y-%m-%d"),
        query.end_date.format("%Y-%m-%d"),
        query.limit.min(MAX_LIMIT),
    );

    if let Some(location) = &query.location_id {
        url.push_str(&format!("&locationid={}", location));
    }
    if let Some(station) = &query.station_id {
        url.push_str(&format!("&stationid={}", station));
    }
    if let Some(data_type) = &query.data_type_id {
        url.push_str(&format!("&datatypeid={}", data_type));
    }

    url
}

// ============================================================================
// Response parsing
// ============================================================================

fn parse_cdo_date(raw: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Parses a `data` endpoint body into a table.
///
/// A body without `results` is an empty table, not an error. Observations
/// with unparseable dates are kept with `date: None` so that downstream
/// transforms can decide how to treat them.
pub fn parse_data_response(json: &str) -> Result<TimeSeriesTable, FetchError> {
    let response: CdoResponse<CdoObservation> =
        serde_json::from_str(json).map_err(|e| FetchError::Parse(e.to_string()))?;

    Ok(response
        .results
        .into_iter()
        .map(|obs| TimeSeriesRecord {
            date: parse_cdo_date(&obs.date),
            value: obs.value,
            data_type: Some(obs.datatype),
            ..Default::default()
        })
        .collect())
}

/// Parses any metadata list endpoint body.
pub fn parse_list_response<T: for<'de> Deserialize<'de>>(json: &str) -> Result<Vec<T>, FetchError> {
    let response: CdoResponse<T> =
        serde_json::from_str(json).map_err(|e| FetchError::Parse(e.to_string()))?;
    Ok(response.results)
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Builds the blocking client used for all CDO requests.
pub fn build_client(config: &NoaaConfig) -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| FetchError::Request(e.to_string()))
}

fn get_body(client: &reqwest::blocking::Client, config: &NoaaConfig, url: &str) -> Result<String, FetchError> {
    let token = config.token.as_deref().ok_or(FetchError::MissingToken)?;

    let response = client
        .get(url)
        .header("token", token)
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(FetchError::Http(response.status().as_u16()));
    }

    Ok(response.text()?)
}

/// Fetch observations for `query`.
pub fn fetch_data(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    query: &DataQuery,
) -> Result<TimeSeriesTable, FetchError> {
    let url = build_data_url(&config.base_url, query);
    logging::debug(Component::Noaa, Some("data"), &format!("GET {}", url));

    let body = get_body(client, config, &url)?;
    let table = parse_data_response(&body)?;

    if table.is_empty() {
        return Err(FetchError::NoData(format!(
            "{} {}..{}",
            query.dataset_id, query.start_date, query.end_date
        )));
    }

    Ok(table)
}

fn fetch_list<T: for<'de> Deserialize<'de>>(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    endpoint: &str,
    limit: u32,
    offset: u32,
    extra: &[(&str, &str)],
) -> Result<Vec<T>, FetchError> {
    let url = build_list_url(&config.base_url, endpoint, limit, offset, extra);
    logging::debug(Component::Noaa, Some(endpoint), &format!("GET {}", url));
    let body = get_body(client, config, &url)?;
    parse_list_response(&body)
}

pub fn fetch_stations(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    limit: u32,
    offset: u32,
) -> Result<Vec<CdoStation>, FetchError> {
    fetch_list(client, config, "stations", limit, offset, &[])
}

pub fn fetch_data_types(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    limit: u32,
    offset: u32,
) -> Result<Vec<CdoDataType>, FetchError> {
    fetch_list(client, config, "datatypes", limit, offset, &[])
}

pub fn fetch_location_categories(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    limit: u32,
    offset: u32,
) -> Result<Vec<CdoLocationCategory>, FetchError> {
    fetch_list(client, config, "locationcategories", limit, offset, &[])
}

pub fn fetch_locations(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    location_category: Option<&str>,
    limit: u32,
    offset: u32,
) -> Result<Vec<CdoLocation>, FetchError> {
    let extra: Vec<(&str, &str)> = location_category
        .map(|c| vec![("locationcategoryid", c)])
        .unwrap_or_default();
    fetch_list(client, config, "locations", limit, offset, &extra)
}

/// The configured dataset/location/data type over the five years ending
/// `today`.
pub fn demo_query(config: &NoaaConfig, today: NaiveDate) -> DataQuery {
    let mut query = DataQuery::new(
        &config.dataset_id,
        today - chrono::Duration::days(365 * 5),
        today,
    );
    query.location_id = Some(config.location_id.clone());
    query.data_type_id = Some(config.data_type_id.clone());
    query.limit = config.limit;
    query
}

/// Fetch the demo temperature series (by default GHCND/TAVG for
/// CITY:US000001).
pub fn fetch_demo_temperature_data(
    client: &reqwest::blocking::Client,
    config: &NoaaConfig,
    today: NaiveDate,
) -> Result<TimeSeriesTable, FetchError> {
    fetch_data(client, config, &demo_query(config, today))
}

// ============================================================================
// Tests
// ============================================================================
