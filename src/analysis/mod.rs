//! Aggregation of extracted tables for plotting
//!
//! This module turns a metrics table into the series the charts draw: group
//! means, per-run series, trailing moving averages and variances, and the
//! episode-termination probability mass functions.

pub mod pmf;
pub mod rolling;
pub mod samples;

pub use pmf::{degenerate_pmf, geometric_pmf};
pub use rolling::{DEFAULT_WINDOW, rolling_mean, rolling_variance};
pub use samples::{
    GroupKey, MetricSample, Series, mean_by, read_metric_samples, run_numbers, run_series,
};
