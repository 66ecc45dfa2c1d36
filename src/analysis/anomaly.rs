//! Z-score anomaly detection.
//!
//! Each value is scored against the mean and population standard deviation
//! of the whole column. A value is anomalous when its score lies strictly
//! beyond `threshold` standard deviations in either direction.

use crate::analysis::stats::{mean, population_std};
use crate::logging::{self, Component};
use crate::model::{Column, TimeSeriesTable};

/// Default anomaly threshold, in standard deviations.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Attaches `z_score` and `is_anomaly` to every record, keeping input order.
///
/// A zero standard deviation (constant or single-value series) scores every
/// record `0.0` and flags nothing. Records missing `column` get no score and
/// are never flagged. Empty tables and tables without `column` are returned
/// unchanged.
pub fn detect_anomalies(table: &TimeSeriesTable, column: Column, threshold: f64) -> TimeSeriesTable {
    if table.is_empty() || !table.has_column(column) {
        return table.clone();
    }

    let values = table.values(column);
    let (Some(mu), Some(sigma)) = (mean(&values), population_std(&values)) else {
        return table.clone();
    };

    if sigma == 0.0 {
        logging::debug(
            Component::Transform,
            Some(column.name()),
            "zero standard deviation; all z-scores set to 0",
        );
        return table
            .iter()
            .cloned()
            .map(|mut record| {
                record.z_score = Some(0.0);
                record.is_anomaly = Some(false);
                record
            })
            .collect();
    }

    table
        .iter()
        .cloned()
        .map(|mut record| {
            let z = record.get(column).map(|x| (x - mu) / sigma);
            record.is_anomaly = Some(z.is_some_and(|z| z.abs() > threshold));
            record.z_score = z;
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSeriesRecord;
    use chrono::NaiveDate;

    fn record(month: u32, value: f64) -> TimeSeriesRecord {
        TimeSeriesRecord::new(NaiveDate::from_ymd_opt(2023, month, 1).unwrap(), value, "TAVG")
    }

    #[test]
    fn test_three_point_example() {
        let table = TimeSeriesTable::new(vec![record(1, 100.0), record(2, 200.0), record(3, 300.0)]);
        let result = detect_anomalies(&table, Column::Value, 1.0);

        let z: Vec<f64> = result.iter().map(|r| r.z_score.unwrap()).collect();
        assert!((z[0] + 1.2247).abs() < 1e-3, "z[0] was {}", z[0]);
        assert!(z[1].abs() < 1e-12, "z[1] was {}", z[1]);
        assert!((z[2] - 1.2247).abs() < 1e-3, "z[2] was {}", z[2]);

        let flags: Vec<bool> = result.iter().map(|r| r.is_anomaly.unwrap()).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_flag_matches_score_against_threshold() {
        let values = [1.0, 2.0, 2.5, 3.0, 40.0, 2.2, 1.8, -20.0];
        let table = TimeSeriesTable::new(
            values.iter().enumerate().map(|(i, v)| record(i as u32 + 1, *v)).collect(),
        );
        for threshold in [0.5, 1.0, 2.0, 3.0] {
            for r in detect_anomalies(&table, Column::Value, threshold).iter() {
                let z = r.z_score.unwrap();
                assert_eq!(r.is_anomaly, Some(z.abs() > threshold), "z={} threshold={}", z, threshold);
            }
        }
    }

    #[test]
    fn test_constant_series_has_zero_scores_and_no_anomalies() {
        let table = TimeSeriesTable::new(vec![record(1, 5.0), record(2, 5.0), record(3, 5.0)]);
        let result = detect_anomalies(&table, Column::Value, 0.0);
        assert!(result.iter().all(|r| r.z_score == Some(0.0)));
        assert!(result.iter().all(|r| r.is_anomaly == Some(false)));
    }

    #[test]
    fn test_order_is_preserved() {
        let table = TimeSeriesTable::new(vec![record(3, 3.0), record(1, 1.0), record(2, 2.0)]);
        let result = detect_anomalies(&table, Column::Value, 2.0);
        let values: Vec<_> = result.iter().map(|r| r.value.unwrap()).collect();
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_missing_value_gets_no_score() {
        let mut gap = record(2, 0.0);
        gap.value = None;
        let table = TimeSeriesTable::new(vec![record(1, 1.0), gap, record(3, 3.0)]);
        let result = detect_anomalies(&table, Column::Value, 2.0);
        assert_eq!(result.records[1].z_score, None);
        assert_eq!(result.records[1].is_anomaly, Some(false));
        assert!((result.records[0].z_score.unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_are_returned_unchanged() {
        assert!(detect_anomalies(&TimeSeriesTable::default(), Column::Value, 2.0).is_empty());

        let table = TimeSeriesTable::new(vec![record(1, 1.0), record(2, 2.0)]);
        assert_eq!(detect_anomalies(&table, Column::MovingAvg, 2.0), table);
    }
}
