//! Climate time-series analysis service.
//!
//! Loads a climate dataset (NOAA Climate Data Online or a synthetic
//! generator) and derives the figures a dashboard shows: moving averages,
//! z-score anomalies, calendar-period trends, and straight-line forecasts.
//!
//! Module map:
//! - `model`     — record/table types and fetch errors
//! - `analysis`  — the pure series transforms
//! - `ingest`    — data source adapters
//! - `summary`   — headline insights and forecast display band
//! - `datatypes` — registry of known climate data types
//! - `config`    — TOML configuration
//! - `logging`   — structured console/file logging

pub mod analysis;
pub mod config;
pub mod datatypes;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod summary;
