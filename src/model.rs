//! Core data types for the climate monitoring service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic beyond simple accessors, and no I/O — only types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// A numeric column of a `TimeSeriesRecord` that transforms can operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    #[default]
    Value,
    MovingAvg,
    ZScore,
    Normalized,
}

impl Column {
    /// Column name as shown to consumers; forecasts are labelled
    /// `"<name>_forecast"`.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Value => "value",
            Column::MovingAvg => "moving_avg",
            Column::ZScore => "z_score",
            Column::Normalized => "value_normalized",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// A single dated observation, plus the derived columns transforms attach.
///
/// Derived fields start as `None` and are only ever filled in on a fresh
/// copy; a transform never rewrites `value`. `None` always means "not
/// available" and must not be read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub moving_avg: Option<f64>,
    pub z_score: Option<f64>,
    pub is_anomaly: Option<bool>,
    pub normalized: Option<f64>,
}

impl TimeSeriesRecord {
    /// A raw observation as produced by a data source.
    pub fn new(date: NaiveDate, value: f64, data_type: &str) -> Self {
        TimeSeriesRecord {
            date: Some(date),
            value: Some(value),
            data_type: Some(data_type.to_string()),
            ..Default::default()
        }
    }

    /// Reads the selected numeric column.
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Value => self.value,
            Column::MovingAvg => self.moving_avg,
            Column::ZScore => self.z_score,
            Column::Normalized => self.normalized,
        }
    }
}

/// An ordered collection of records. Input order carries no meaning;
/// date-dependent transforms sort their own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesTable {
    pub records: Vec<TimeSeriesRecord>,
}

impl TimeSeriesTable {
    pub fn new(records: Vec<TimeSeriesRecord>) -> Self {
        TimeSeriesTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSeriesRecord> {
        self.records.iter()
    }

    /// True when at least one record carries a date. A table with no dated
    /// record is treated as lacking the date column altogether.
    pub fn has_dates(&self) -> bool {
        self.records.iter().any(|r| r.date.is_some())
    }

    /// True when at least one record carries a value for `column`.
    pub fn has_column(&self, column: Column) -> bool {
        self.records.iter().any(|r| r.get(column).is_some())
    }

    /// Non-missing values of `column`, in table order.
    pub fn values(&self, column: Column) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.get(column)).collect()
    }

    /// Appends all records of `other`, consuming it.
    pub fn extend(&mut self, other: TimeSeriesTable) {
        self.records.extend(other.records);
    }
}

impl FromIterator<TimeSeriesRecord> for TimeSeriesTable {
    fn from_iter<I: IntoIterator<Item = TimeSeriesRecord>>(iter: I) -> Self {
        TimeSeriesTable::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TimeSeriesTable {
    type Item = TimeSeriesRecord;
    type IntoIter = std::vec::IntoIter<TimeSeriesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or decoding NOAA CDO data.
#[derive(Debug, PartialEq)]
pub enum FetchError {
    /// Non-2xx HTTP response from the CDO API.
    Http(u16),
    /// The request could not be sent or the body could not be read.
    Request(String),
    /// The response body could not be deserialized.
    Parse(String),
    /// The request succeeded but returned no usable records.
    NoData(String),
    /// No API token was configured.
    MissingToken,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(code) => write!(f, "HTTP error: {}", code),
            FetchError::Request(msg) => write!(f, "Request failed: {}", msg),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FetchError::NoData(what) => write!(f, "No data returned for {}", what),
            FetchError::MissingToken => write!(f, "No NOAA API token configured"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Http(status.as_u16()),
            None => FetchError::Request(err.to_string()),
        }
    }
}
