//! Headline insights and display-only forecast dressing.
//!
//! This is consumer-side code: it reads transform output and produces the
//! figures a dashboard card or report line shows. Nothing here feeds back
//! into the transforms.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::{compute_trends, Granularity, PeriodSpec};
use crate::model::{Column, TimeSeriesTable};

/// Value with the date of the record it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedValue {
    pub value: f64,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub count: usize,
    pub mean: f64,
    pub min: DatedValue,
    pub max: DatedValue,
    /// Year-over-year change between the first and last calendar year.
    /// `None` when unavailable or undefined; never reported as zero.
    pub yearly_change_percent: Option<f64>,
}

impl Insights {
    /// e.g. `+12.50%`, or `—` when no trend is available.
    pub fn trend_label(&self) -> String {
        match self.yearly_change_percent {
            Some(change) if change > 0.0 => format!("+{:.2}%", change),
            Some(change) => format!("{:.2}%", change),
            None => "—".to_string(),
        }
    }
}

/// Computes headline insights over `value`. `None` when the table has no
/// values at all.
pub fn summarize(table: &TimeSeriesTable) -> Option<Insights> {
    let mut min: Option<DatedValue> = None;
    let mut max: Option<DatedValue> = None;
    let mut sum = 0.0;
    let mut count = 0;

    for record in table.iter() {
        let Some(value) = record.value else { continue };
        sum += value;
        count += 1;
        // Strict comparison keeps the first record on ties.
        if min.as_ref().is_none_or(|m| value < m.value) {
            min = Some(DatedValue { value, date: record.date });
        }
        if max.as_ref().is_none_or(|m| value > m.value) {
            max = Some(DatedValue { value, date: record.date });
        }
    }

    let yearly_change_percent = if table.len() > 1 {
        let yearly = [PeriodSpec::new("yearly", Granularity::Year, 365)];
        compute_trends(table, Column::Value, &yearly)
            .and_then(|report| report.get("yearly").and_then(|t| t.change_percent))
            .and_then(|change| change.value())
    } else {
        None
    };

    Some(Insights {
        count,
        mean: sum / count as f64,
        min: min?,
        max: max?,
        yearly_change_percent,
    })
}

/// One row of the forecast display band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopePoint {
    pub date: NaiveDate,
    pub lower: f64,
    pub point: f64,
    pub upper: f64,
}

/// Wraps each forecast point in a ±`fraction` band for display.
///
/// This is a fixed visual margin, not a statistical confidence interval.
pub fn forecast_envelope(forecast: &TimeSeriesTable, fraction: f64) -> Vec<EnvelopePoint> {
    forecast
        .iter()
        .filter_map(|r| {
            let (date, point) = (r.date?, r.value?);
            // Scaling flips order for negative points.
            let (a, b) = (point * (1.0 - fraction), point * (1.0 + fraction));
            Some(EnvelopePoint {
                date,
                lower: a.min(b),
                point,
                upper: a.max(b),
            })
        })
        .collect()
}
