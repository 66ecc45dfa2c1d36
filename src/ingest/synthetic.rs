//! Synthetic climate data generator
//!
//! Produces a deterministic five-year dataset for development and demos
//! when no NOAA token is available. Three series are generated:
//!
//! - `TAVG`    — monthly temperature with a warming drift and a seasonal cycle
//! - `PRCP`    — monthly precipitation with seasonal and three-month cycles
//! - `EXTREME` — an event index sampled every 120 days, rising steadily
//!
//! # Clock injection
//! `sample_data_at` takes `today` rather than reading the clock, so the
//! output is fully reproducible in tests.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::datatypes::{TYPE_EXTREME, TYPE_PRCP, TYPE_TAVG};
use crate::logging::{self, Component};
use crate::model::{TimeSeriesRecord, TimeSeriesTable};

/// Span covered by the generated data.
pub const SAMPLE_SPAN_DAYS: i64 = 365 * 5;

/// Spacing of the `EXTREME` series.
pub const EXTREME_INTERVAL_DAYS: i64 = 120;

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// All month-end dates in `[start, end]`.
pub fn month_ends(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());

    while let Some(date) = month_end(year, month) {
        if date > end {
            break;
        }
        if date >= start {
            dates.push(date);
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    dates
}

// ---------------------------------------------------------------------------
// Series formulas
// ---------------------------------------------------------------------------

fn temperature(i: usize, n: usize) -> f64 {
    let phase = (i % 12) as f64 - 6.0;
    let alternation = (i % 2) as f64;
    20.0 + 5.0 * i as f64 / n as f64 + 10.0 * (0.5 - 0.5 * phase / 6.0) + 2.0 * (0.5 - alternation)
}

fn precipitation(i: usize) -> f64 {
    let phase = (i % 12) as f64 - 6.0;
    let quarter = (i % 3) as f64 - 1.0;
    50.0 + 30.0 * phase / 6.0 + 10.0 * quarter
}

fn extreme(i: usize) -> f64 {
    90.0 + 2.0 * i as f64
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generates the full mixed-type sample dataset ending at `today`.
pub fn sample_data_at(today: NaiveDate) -> TimeSeriesTable {
    let start = today - Duration::days(SAMPLE_SPAN_DAYS);
    let months = month_ends(start, today);
    let n = months.len();

    let mut table: TimeSeriesTable = months
        .iter()
        .enumerate()
        .map(|(i, date)| TimeSeriesRecord::new(*date, temperature(i, n), TYPE_TAVG))
        .collect();

    table.extend(
        months
            .iter()
            .enumerate()
            .map(|(i, date)| TimeSeriesRecord::new(*date, precipitation(i), TYPE_PRCP))
            .collect(),
    );

    table.extend(
        (0..)
            .map(|i| (i, start + Duration::days(i as i64 * EXTREME_INTERVAL_DAYS)))
            .take_while(|(_, date)| *date <= today)
            .map(|(i, date)| TimeSeriesRecord::new(date, extreme(i), TYPE_EXTREME))
            .collect(),
    );

    logging::debug(
        Component::Synthetic,
        None,
        &format!("generated {} records ending {}", table.len(), today),
    );

    table
}

/// Convenience wrapper that uses today's local date.
/// Use `sample_data_at` in tests to keep them deterministic.
pub fn sample_data() -> TimeSeriesTable {
    sample_data_at(Local::now().date_naive())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
