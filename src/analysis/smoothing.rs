//! Trailing moving average and min-max normalization.

use crate::analysis::stats::sorted_by_date;
use crate::logging::{self, Component};
use crate::model::{Column, TimeSeriesTable};

/// Default trailing window, in records (a year of monthly data).
pub const DEFAULT_WINDOW_SIZE: usize = 12;

/// Sorts `table` by date and attaches a trailing `moving_avg` of `value`.
///
/// Each record's average covers itself and the `window_size - 1` records
/// before it in date order. Until a full window is available, and whenever
/// the window contains a missing value, `moving_avg` is `None`.
///
/// A table lacking dates or values is returned unchanged.
pub fn moving_average(table: &TimeSeriesTable, window_size: usize) -> TimeSeriesTable {
    if table.is_empty() {
        return TimeSeriesTable::default();
    }
    if !table.has_dates() || !table.has_column(Column::Value) {
        logging::debug(
            Component::Transform,
            Some("moving_avg"),
            "table lacks date or value column; returning input unchanged",
        );
        return table.clone();
    }

    let mut sorted = sorted_by_date(&table.records);
    let values: Vec<Option<f64>> = sorted.iter().map(|r| r.value).collect();

    for (i, record) in sorted.iter_mut().enumerate() {
        record.moving_avg = trailing_mean(&values, i, window_size);
    }

    TimeSeriesTable::new(sorted)
}

fn trailing_mean(values: &[Option<f64>], end: usize, window_size: usize) -> Option<f64> {
    if window_size == 0 || end + 1 < window_size {
        return None;
    }
    let window = &values[end + 1 - window_size..=end];
    let sum = window.iter().copied().sum::<Option<f64>>()?;
    Some(sum / window_size as f64)
}

/// Scales `column` into `[0, 1]` as `normalized`.
///
/// When every value is equal there is no range to scale against and each
/// record gets `0.0`. Records missing the column stay `None`.
pub fn normalize(table: &TimeSeriesTable, column: Column) -> TimeSeriesTable {
    if table.is_empty() || !table.has_column(column) {
        return table.clone();
    }

    let values = table.values(column);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    table
        .iter()
        .cloned()
        .map(|mut record| {
            record.normalized = record.get(column).map(|x| {
                if max > min { (x - min) / (max - min) } else { 0.0 }
            });
            record
        })
        .collect()
}
