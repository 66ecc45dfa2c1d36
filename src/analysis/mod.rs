/// Series transforms for the climate monitoring service.
///
/// Every function here is pure: it borrows a `TimeSeriesTable`, never
/// mutates it, and returns a freshly allocated result. Degenerate input
/// (empty tables, absent columns) degrades to an empty or unchanged result
/// instead of an error, so a dashboard can always render something.
///
/// Submodules:
/// - `groupings` — partitions and filters a table by data type.
/// - `smoothing` — trailing moving average and min-max normalization.
/// - `anomaly`   — z-score anomaly flags.
/// - `trends`    — calendar-period bucket statistics and change percent.
/// - `forecast`  — straight-line extrapolation.

pub mod anomaly;
pub mod forecast;
pub mod groupings;
pub mod smoothing;
pub mod stats;
pub mod trends;

pub use anomaly::{detect_anomalies, DEFAULT_ANOMALY_THRESHOLD};
pub use forecast::{forecast_linear, DEFAULT_FORECAST_DAYS};
pub use groupings::{filter_by_type, group_by_type};
pub use smoothing::{moving_average, normalize, DEFAULT_WINDOW_SIZE};
pub use trends::{compute_trends, seasonal_profile, ChangePercent, Granularity, PeriodSpec, TrendReport};
