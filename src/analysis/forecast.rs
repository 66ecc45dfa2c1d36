//! Straight-line forecast.
//!
//! Fits y = intercept + slope * i by ordinary least squares, where `i` is
//! the record's position in date order. Calendar spacing is ignored: two
//! records a year apart are one step apart, same as two records a day apart.
//! Forecast points are then laid out one calendar day apart after the last
//! observation.

use chrono::{Duration, NaiveDate};

use crate::analysis::stats::sorted_by_date;
use crate::logging::{self, Component};
use crate::model::{Column, TimeSeriesRecord, TimeSeriesTable};

/// Default forecast horizon, in days.
pub const DEFAULT_FORECAST_DAYS: usize = 30;

/// Least-squares line over index positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    /// Fits `values` against indices `0..n`. `None` below two points.
    pub fn fit(values: &[f64]) -> Option<LinearFit> {
        if values.len() < 2 {
            return None;
        }

        let n = values.len() as f64;
        let sum_t: f64 = (0..values.len()).map(|i| i as f64).sum();
        let sum_y: f64 = values.iter().sum();
        let sum_t2: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();
        let sum_ty: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();

        // Distinct integer indices keep this positive for n >= 2.
        let denominator = n * sum_t2 - sum_t * sum_t;
        let slope = (n * sum_ty - sum_t * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_t) / n;

        Some(LinearFit { intercept, slope })
    }

    pub fn predict_at(&self, t: f64) -> f64 {
        self.intercept + self.slope * t
    }
}

/// Extrapolates `column` for `forecast_days` days past the last observed date.
///
/// Uses records that have both a date and a `column` value, in date order.
/// Returns a fresh table of `forecast_days` records typed
/// `"<column>_forecast"`, or an empty table when fewer than two usable
/// points exist. The horizon is cut short at `NaiveDate::MAX`.
pub fn forecast_linear(table: &TimeSeriesTable, column: Column, forecast_days: usize) -> TimeSeriesTable {
    if table.is_empty() || !table.has_dates() || !table.has_column(column) {
        return TimeSeriesTable::default();
    }

    let points: Vec<(NaiveDate, f64)> = sorted_by_date(&table.records)
        .iter()
        .filter_map(|r| Some((r.date?, r.get(column)?)))
        .collect();

    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let (Some(fit), Some(last_date)) = (LinearFit::fit(&values), points.iter().map(|(d, _)| *d).max()) else {
        logging::debug(
            Component::Transform,
            Some("forecast"),
            &format!("{} usable points; forecast needs at least 2", points.len()),
        );
        return TimeSeriesTable::default();
    };

    let label = format!("{}_forecast", column.name());
    let n = values.len();

    // Stops early if the horizon runs past the last representable date.
    (0..forecast_days)
        .map_while(|i| {
            let date = last_date.checked_add_signed(Duration::days(i as i64 + 1))?;
            Some(TimeSeriesRecord {
                date: Some(date),
                value: Some(fit.predict_at((n + i) as f64)),
                data_type: Some(label.clone()),
                ..Default::default()
            })
        })
        .collect()
}
