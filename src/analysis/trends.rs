//! Calendar-period trend statistics.
//!
//! Records are bucketed by calendar year, calendar month, or ISO week, and
//! each bucket is summarised. The trend itself is the relative change
//! between the first and last bucket means.
//!
//! `PeriodSpec::days` is carried for display only. Bucketing never uses it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analysis::stats::{mean, sample_std, sorted_by_date};
use crate::logging::{self, Component};
use crate::model::{Column, TimeSeriesTable};

// ---------------------------------------------------------------------------
// Period configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Year,
    Month,
    Week,
}

/// Calendar bucket key. Ordering is chronological within one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodKey {
    Year(i32),
    Month { year: i32, month: u32 },
    /// ISO 8601 week (Monday start); `year` is the ISO week-numbering year.
    Week { year: i32, week: u32 },
}

impl Granularity {
    pub fn key(&self, date: NaiveDate) -> PeriodKey {
        match self {
            Granularity::Year => PeriodKey::Year(date.year()),
            Granularity::Month => PeriodKey::Month { year: date.year(), month: date.month() },
            Granularity::Week => {
                let iso = date.iso_week();
                PeriodKey::Week { year: iso.year(), week: iso.week() }
            }
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodKey::Year(y) => write!(f, "{}", y),
            PeriodKey::Month { year, month } => write!(f, "{}-{:02}", year, month),
            PeriodKey::Week { year, week } => write!(f, "{}-W{:02}", year, week),
        }
    }
}

/// A named trend period. `days` is a nominal length kept for labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSpec {
    pub name: String,
    pub granularity: Granularity,
    pub days: u32,
}

impl PeriodSpec {
    pub fn new(name: &str, granularity: Granularity, days: u32) -> Self {
        PeriodSpec { name: name.to_string(), granularity, days }
    }

    /// yearly / monthly / weekly, in that order.
    pub fn defaults() -> Vec<PeriodSpec> {
        vec![
            PeriodSpec::new("yearly", Granularity::Year, 365),
            PeriodSpec::new("monthly", Granularity::Month, 30),
            PeriodSpec::new("weekly", Granularity::Week, 7),
        ]
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Summary statistics for one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    pub period: PeriodKey,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single-value bucket.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Relative change between first and last bucket means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ChangePercent {
    Defined(f64),
    /// The first bucket's mean was zero.
    Undefined,
}

impl ChangePercent {
    pub fn value(&self) -> Option<f64> {
        match self {
            ChangePercent::Defined(v) => Some(*v),
            ChangePercent::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTrend {
    pub name: String,
    pub days: u32,
    pub buckets: Vec<BucketStats>,
    /// `None` when fewer than two buckets exist.
    pub change_percent: Option<ChangePercent>,
}

/// Per-period trends, in the order the periods were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub periods: Vec<PeriodTrend>,
}

impl TrendReport {
    pub fn get(&self, name: &str) -> Option<&PeriodTrend> {
        self.periods.iter().find(|p| p.name == name)
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Computes bucket statistics and change percent for each of `periods`.
///
/// Only records carrying both a date and a `column` value take part.
/// Returns `None` ("no trend available") for an empty table or one lacking
/// dates or `column`; this is distinct from a zero change.
pub fn compute_trends(
    table: &TimeSeriesTable,
    column: Column,
    periods: &[PeriodSpec],
) -> Option<TrendReport> {
    if table.is_empty() || !table.has_dates() || !table.has_column(column) {
        logging::debug(
            Component::Transform,
            Some("trends"),
            "empty table or missing date/value column; no trend available",
        );
        return None;
    }

    let points: Vec<(NaiveDate, f64)> = sorted_by_date(&table.records)
        .iter()
        .filter_map(|r| Some((r.date?, r.get(column)?)))
        .collect();

    if points.is_empty() {
        logging::debug(
            Component::Transform,
            Some("trends"),
            "no record carries both a date and a value; no trend available",
        );
        return None;
    }

    let trends = periods
        .iter()
        .map(|spec| {
            let buckets = bucket_stats(&points, spec.granularity);
            let change_percent = change_between(&buckets);
            PeriodTrend {
                name: spec.name.clone(),
                days: spec.days,
                buckets,
                change_percent,
            }
        })
        .collect();

    Some(TrendReport { periods: trends })
}

/// `points` must already be in date order.
fn bucket_stats(points: &[(NaiveDate, f64)], granularity: Granularity) -> Vec<BucketStats> {
    let mut grouped: Vec<(PeriodKey, Vec<f64>)> = Vec::new();
    for (date, value) in points {
        let key = granularity.key(*date);
        if let Some((last, values)) = grouped.last_mut() {
            if *last == key {
                values.push(*value);
                continue;
            }
        }
        grouped.push((key, vec![*value]));
    }

    grouped
        .into_iter()
        .filter_map(|(period, values)| {
            Some(BucketStats {
                period,
                count: values.len(),
                mean: mean(&values)?,
                std: sample_std(&values),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        })
        .collect()
}

fn change_between(buckets: &[BucketStats]) -> Option<ChangePercent> {
    if buckets.len() < 2 {
        return None;
    }
    let first = buckets.first()?.mean;
    let last = buckets.last()?.mean;
    if first == 0.0 {
        return Some(ChangePercent::Undefined);
    }
    Some(ChangePercent::Defined((last - first) / first * 100.0))
}

/// Mean of `column` per calendar month, chronologically ordered. Feeds the
/// seasonality view, which overlays one line per year.
pub fn seasonal_profile(table: &TimeSeriesTable, column: Column) -> Vec<(i32, u32, f64)> {
    if table.is_empty() || !table.has_dates() || !table.has_column(column) {
        return Vec::new();
    }

    let points: Vec<(NaiveDate, f64)> = sorted_by_date(&table.records)
        .iter()
        .filter_map(|r| Some((r.date?, r.get(column)?)))
        .collect();

    bucket_stats(&points, Granularity::Month)
        .into_iter()
        .filter_map(|b| match b.period {
            PeriodKey::Month { year, month } => Some((year, month, b.mean)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSeriesRecord;

    fn record(y: i32, m: u32, d: u32, value: f64) -> TimeSeriesRecord {
        TimeSeriesRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), value, "TAVG")
    }

    fn yearly() -> Vec<PeriodSpec> {
        vec![PeriodSpec::new("yearly", Granularity::Year, 365)]
    }

    #[test]
    fn test_two_years_doubling_is_one_hundred_percent() {
        let table = TimeSeriesTable::new(vec![record(2021, 6, 1, 10.0), record(2022, 6, 1, 20.0)]);
        let report = compute_trends(&table, Column::Value, &yearly()).expect("trend available");
        let trend = report.get("yearly").unwrap();
        assert_eq!(trend.buckets.len(), 2);
        assert_eq!(trend.change_percent, Some(ChangePercent::Defined(100.0)));
    }

    #[test]
    fn test_unsorted_input_is_bucketed_chronologically() {
        let table = TimeSeriesTable::new(vec![
            record(2022, 3, 1, 30.0),
            record(2021, 1, 1, 10.0),
            record(2022, 1, 1, 10.0),
            record(2021, 5, 1, 30.0),
        ]);
        let report = compute_trends(&table, Column::Value, &yearly()).unwrap();
        let buckets = &report.get("yearly").unwrap().buckets;
        assert_eq!(buckets[0].period, PeriodKey::Year(2021));
        assert_eq!(buckets[0].mean, 20.0);
        assert_eq!(buckets[0].min, 10.0);
        assert_eq!(buckets[0].max, 30.0);
        assert!((buckets[0].std.unwrap() - 14.142135).abs() < 1e-5);
        assert_eq!(report.get("yearly").unwrap().change_percent, Some(ChangePercent::Defined(0.0)));
    }

    #[test]
    fn test_zero_first_mean_is_undefined_not_zero() {
        let table = TimeSeriesTable::new(vec![record(2021, 1, 1, 0.0), record(2022, 1, 1, 5.0)]);
        let report = compute_trends(&table, Column::Value, &yearly()).unwrap();
        assert_eq!(report.get("yearly").unwrap().change_percent, Some(ChangePercent::Undefined));
    }

    #[test]
    fn test_single_bucket_has_no_change() {
        let table = TimeSeriesTable::new(vec![record(2021, 1, 1, 1.0), record(2021, 2, 1, 3.0)]);
        let report = compute_trends(&table, Column::Value, &PeriodSpec::defaults()).unwrap();
        assert_eq!(report.get("yearly").unwrap().change_percent, None);
        assert_eq!(
            report.get("monthly").unwrap().change_percent,
            Some(ChangePercent::Defined(200.0))
        );
        assert_eq!(report.get("yearly").unwrap().buckets[0].std, Some(2.0_f64.sqrt()));
    }

    #[test]
    fn test_weekly_buckets_follow_iso_weeks() {
        // 2023-01-01 is a Sunday (ISO week 2022-W52); 2023-01-02 starts 2023-W01.
        let table = TimeSeriesTable::new(vec![
            record(2023, 1, 1, 1.0),
            record(2023, 1, 2, 2.0),
            record(2023, 1, 8, 4.0),
        ]);
        let weekly = vec![PeriodSpec::new("weekly", Granularity::Week, 7)];
        let report = compute_trends(&table, Column::Value, &weekly).unwrap();
        let buckets = &report.get("weekly").unwrap().buckets;
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, PeriodKey::Week { year: 2022, week: 52 });
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[1].period.to_string(), "2023-W01");
    }

    #[test]
    fn test_day_counts_do_not_affect_bucketing() {
        let table = TimeSeriesTable::new(vec![record(2021, 12, 31, 10.0), record(2022, 1, 1, 20.0)]);
        let odd = vec![PeriodSpec::new("yearly", Granularity::Year, 9999)];
        let report = compute_trends(&table, Column::Value, &odd).unwrap();
        assert_eq!(report.get("yearly").unwrap().buckets.len(), 2);
    }

    #[test]
    fn test_no_trend_available_for_degenerate_input() {
        assert!(compute_trends(&TimeSeriesTable::default(), Column::Value, &yearly()).is_none());

        let undated = TimeSeriesTable::new(vec![TimeSeriesRecord { value: Some(1.0), ..Default::default() }]);
        assert!(compute_trends(&undated, Column::Value, &yearly()).is_none());

        let table = TimeSeriesTable::new(vec![record(2021, 1, 1, 1.0)]);
        assert!(compute_trends(&table, Column::ZScore, &yearly()).is_none());
    }

    #[test]
    fn test_dates_and_values_on_disjoint_records_give_no_trend() {
        let table = TimeSeriesTable::new(vec![
            TimeSeriesRecord {
                date: NaiveDate::from_ymd_opt(2021, 1, 1),
                value: None,
                ..Default::default()
            },
            TimeSeriesRecord { value: Some(5.0), ..Default::default() },
        ]);
        assert!(compute_trends(&table, Column::Value, &PeriodSpec::defaults()).is_none());
    }

    #[test]
    fn test_seasonal_profile_means_per_month() {
        let table = TimeSeriesTable::new(vec![
            record(2022, 2, 10, 4.0),
            record(2022, 1, 5, 1.0),
            record(2022, 1, 20, 3.0),
            record(2023, 1, 5, 7.0),
        ]);
        assert_eq!(
            seasonal_profile(&table, Column::Value),
            vec![(2022, 1, 2.0), (2022, 2, 4.0), (2023, 1, 7.0)]
        );
        assert!(seasonal_profile(&TimeSeriesTable::default(), Column::Value).is_empty());
    }
}
