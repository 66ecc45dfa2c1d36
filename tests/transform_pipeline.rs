//! Offline end-to-end tests: synthetic adapter → transforms → summary.
//!
//! These exercise the public API the way the report runner does, with a
//! fixed "today" so every run sees the same dataset.

use chrono::NaiveDate;

use climon_service::analysis::{
    compute_trends, detect_anomalies, filter_by_type, forecast_linear, group_by_type, moving_average,
    normalize, seasonal_profile, ChangePercent, PeriodSpec,
};
use climon_service::datatypes::{TYPE_EXTREME, TYPE_PRCP, TYPE_TAVG};
use climon_service::ingest::synthetic::sample_data_at;
use climon_service::model::{Column, TimeSeriesRecord, TimeSeriesTable};
use climon_service::summary::{forecast_envelope, summarize};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Documented example
// ---------------------------------------------------------------------------

#[test]
fn test_three_month_anomaly_example() {
    let table = TimeSeriesTable::new(vec![
        TimeSeriesRecord::new(date(2023, 1, 1), 100.0, "TAVG"),
        TimeSeriesRecord::new(date(2023, 2, 1), 200.0, "TAVG"),
        TimeSeriesRecord::new(date(2023, 3, 1), 300.0, "TAVG"),
    ]);

    let result = detect_anomalies(&table, Column::Value, 1.0);
    let z: Vec<f64> = result.iter().map(|r| r.z_score.unwrap()).collect();
    let expected = [-1.2247, 0.0, 1.2247];
    for (got, want) in z.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "z-score {} should be ≈ {}", got, want);
    }
    let flags: Vec<_> = result.iter().map(|r| r.is_anomaly.unwrap()).collect();
    assert_eq!(flags, vec![true, false, true]);

    // The input table is untouched.
    assert!(table.iter().all(|r| r.z_score.is_none() && r.is_anomaly.is_none()));
}

// ---------------------------------------------------------------------------
// Empty-input law
// ---------------------------------------------------------------------------

#[test]
fn test_every_transform_accepts_an_empty_table() {
    let empty = TimeSeriesTable::default();
    assert!(moving_average(&empty, 12).is_empty());
    assert!(detect_anomalies(&empty, Column::Value, 2.0).is_empty());
    assert!(compute_trends(&empty, Column::Value, &PeriodSpec::defaults()).is_none());
    assert!(forecast_linear(&empty, Column::Value, 30).is_empty());
    assert!(group_by_type(&empty).is_empty());
    assert!(normalize(&empty, Column::Value).is_empty());
    assert!(filter_by_type(&empty, TYPE_TAVG).is_empty());
    assert!(seasonal_profile(&empty, Column::Value).is_empty());
    assert!(summarize(&empty).is_none());
}

// ---------------------------------------------------------------------------
// Synthetic pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_grouping_synthetic_data_round_trips() {
    let dataset = sample_data_at(fixed_today());
    let groups = group_by_type(&dataset);

    assert_eq!(groups.keys().map(String::as_str).collect::<Vec<_>>(), vec![TYPE_EXTREME, TYPE_PRCP, TYPE_TAVG]);
    let total: usize = groups.values().map(TimeSeriesTable::len).sum();
    assert_eq!(total, dataset.len());

    for (data_type, group) in &groups {
        assert_eq!(group, &filter_by_type(&dataset, data_type), "group {} must equal filter", data_type);
    }
}

#[test]
fn test_moving_average_over_monthly_temperature() {
    let tavg = filter_by_type(&sample_data_at(fixed_today()), TYPE_TAVG);
    let smoothed = moving_average(&tavg, 12);

    assert_eq!(smoothed.len(), tavg.len());
    assert!(smoothed.records[..11].iter().all(|r| r.moving_avg.is_none()));
    assert!(smoothed.records[11..].iter().all(|r| r.moving_avg.is_some()));

    // A full year window cancels the seasonal cycle, leaving the slow warming
    // drift: consecutive averages differ by well under a degree.
    let avgs: Vec<f64> = smoothed.iter().filter_map(|r| r.moving_avg).collect();
    for pair in avgs.windows(2) {
        assert!((pair[1] - pair[0]).abs() < 1.0, "12-month average jumped {} → {}", pair[0], pair[1]);
    }
}

#[test]
fn test_extreme_series_trend_and_forecast() {
    let extreme = filter_by_type(&sample_data_at(fixed_today()), TYPE_EXTREME);

    let report = compute_trends(&extreme, Column::Value, &PeriodSpec::defaults()).expect("trend available");
    let yearly = report.get("yearly").unwrap();
    match yearly.change_percent {
        Some(ChangePercent::Defined(change)) => assert!(change > 0.0, "rising index should trend up, got {}", change),
        other => panic!("expected a defined yearly change, got {:?}", other),
    }

    // The index rises by exactly 2 per sample, so the fit is exact.
    let forecast = forecast_linear(&extreme, Column::Value, 3);
    let values: Vec<f64> = forecast.iter().map(|r| r.value.unwrap()).collect();
    for (got, want) in values.iter().zip([122.0, 124.0, 126.0]) {
        assert!((got - want).abs() < 1e-6, "forecast {} should be {}", got, want);
    }
    let last_observed = extreme.iter().filter_map(|r| r.date).max().unwrap();
    assert_eq!(forecast.records[0].date, last_observed.succ_opt());

    let band = forecast_envelope(&forecast, 0.10);
    assert!(band.iter().all(|p| p.lower < p.point && p.point < p.upper));
}

#[test]
fn test_anomaly_flags_are_consistent_on_precipitation() {
    let prcp = filter_by_type(&sample_data_at(fixed_today()), TYPE_PRCP);
    for threshold in [1.0, 1.5, 2.0] {
        let flagged = detect_anomalies(&prcp, Column::Value, threshold);
        assert_eq!(flagged.len(), prcp.len());
        for r in flagged.iter() {
            assert_eq!(r.is_anomaly, Some(r.z_score.unwrap().abs() > threshold));
        }
    }
}

#[test]
fn test_transforms_can_run_concurrently_on_shared_input() {
    let dataset = std::sync::Arc::new(filter_by_type(&sample_data_at(fixed_today()), TYPE_TAVG));

    let handles: Vec<_> = (1..=4)
        .map(|window| {
            let shared = std::sync::Arc::clone(&dataset);
            std::thread::spawn(move || moving_average(&shared, window))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let smoothed = handle.join().expect("transform thread panicked");
        assert_eq!(smoothed.len(), dataset.len());
        assert_eq!(smoothed.iter().filter(|r| r.moving_avg.is_none()).count(), i);
    }
    assert!(dataset.iter().all(|r| r.moving_avg.is_none()), "shared input must not be mutated");
}
