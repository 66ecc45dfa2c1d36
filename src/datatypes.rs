//! Data type registry for the climate monitoring service.
//!
//! Defines the canonical list of climate data types this service knows how
//! to present, along with their display titles and units. This is the
//! single source of truth for data type codes — other modules should
//! reference types from here rather than hardcoding labels.

// ---------------------------------------------------------------------------
// Data type codes
// ---------------------------------------------------------------------------

/// GHCN-Daily average temperature.
pub const TYPE_TAVG: &str = "TAVG";

/// GHCN-Daily precipitation.
pub const TYPE_PRCP: &str = "PRCP";

/// Extreme-event intensity index (synthetic data only).
pub const TYPE_EXTREME: &str = "EXTREME";

// ---------------------------------------------------------------------------
// Data type metadata
// ---------------------------------------------------------------------------

/// Metadata for a single climate data type.
pub struct DataTypeInfo {
    /// Code as it appears in the record's `type` field.
    pub code: &'static str,
    /// Chart / report title.
    pub title: &'static str,
    /// Axis label including the unit.
    pub axis_label: &'static str,
    /// Whether the NOAA CDO API serves this type. Synthetic-only types
    /// cannot be fetched live.
    pub available_live: bool,
}

pub static DATA_TYPE_REGISTRY: &[DataTypeInfo] = &[
    DataTypeInfo {
        code: TYPE_TAVG,
        title: "Temperature",
        axis_label: "Temperature (°C)",
        available_live: true,
    },
    DataTypeInfo {
        code: TYPE_PRCP,
        title: "Precipitation",
        axis_label: "Precipitation (mm)",
        available_live: true,
    },
    DataTypeInfo {
        code: TYPE_EXTREME,
        title: "Extreme events",
        axis_label: "Event intensity",
        available_live: false,
    },
];

/// Looks up a data type by code. Returns `None` if not registered.
pub fn find_data_type(code: &str) -> Option<&'static DataTypeInfo> {
    DATA_TYPE_REGISTRY.iter().find(|t| t.code == code)
}

/// Title for `code`, falling back to a generic label for unknown types.
pub fn title_for(code: &str) -> &'static str {
    find_data_type(code).map(|t| t.title).unwrap_or("Data")
}

/// Axis label for `code`, falling back to a generic label for unknown types.
pub fn axis_label_for(code: &str) -> &'static str {
    find_data_type(code).map(|t| t.axis_label).unwrap_or("Value")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
