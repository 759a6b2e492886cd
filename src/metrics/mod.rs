// src/metrics/mod.rs

//! Reductions applied to a finished run's logs.

pub mod oracle_tracking;
pub mod pool_value;

pub use oracle_tracking::OracleTracking;
pub use pool_value::PoolValue;

use crate::errors::{Result, SimError};
use crate::pool::LlammaPool;
use crate::state_log::StateLogs;
use crate::table::Frame;
use statrs::statistics::Statistics;

/// What a metric contributes: per-trade columns on the run's index, and a
/// single summary row.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricOutput {
    pub per_trade: Frame,
    pub summary: Frame,
}

/// Column names must be unique across all metrics given to one
/// [`StateLog`](crate::state_log::StateLog).
pub trait Metric {
    fn name(&self) -> &str;
    fn compute(&self, logs: &StateLogs) -> Result<MetricOutput>;
}

/// A metric that needs the pool it measures, bound once before the run.
pub trait PoolMetric: Metric {
    fn set_pool(&mut self, pool: &dyn LlammaPool);
}

pub enum MetricKind {
    Plain(Box<dyn Metric>),
    PoolBound(Box<dyn PoolMetric>),
}

impl MetricKind {
    pub fn name(&self) -> &str {
        match self {
            MetricKind::Plain(m) => m.name(),
            MetricKind::PoolBound(m) => m.name(),
        }
    }

    /// No-op for plain metrics.
    pub fn bind_pool(&mut self, pool: &dyn LlammaPool) {
        if let MetricKind::PoolBound(m) = self {
            m.set_pool(pool);
        }
    }

    pub fn compute(&self, logs: &StateLogs) -> Result<MetricOutput> {
        match self {
            MetricKind::Plain(m) => m.compute(logs),
            MetricKind::PoolBound(m) => m.compute(logs),
        }
    }
}

/// Metrics every autosim run reports.
pub fn default_metrics() -> Vec<MetricKind> {
    vec![
        MetricKind::PoolBound(Box::new(PoolValue::default())),
        MetricKind::Plain(Box::new(OracleTracking)),
    ]
}

/// Numeric column from the recorded state, falling back to the price sample
/// and caller fields.
pub(crate) fn float_column(logs: &StateLogs, metric: &str, column: &str) -> Result<Vec<f64>> {
    [&logs.state_data, &logs.price_sample, &logs.extra]
        .into_iter()
        .find_map(|frame| frame.column_f64(column))
        .ok_or_else(|| SimError::Metric {
            metric: metric.to_string(),
            reason: format!("missing numeric column `{column}`"),
        })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::mean(values.iter())
}

/// Sample standard deviation; zero for fewer than two values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    Statistics::std_dev(values.iter())
}

pub(crate) fn max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::max(values.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_handle_short_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[4.0]), 0.0);
        assert_eq!(max(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
        assert!((std_dev(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert_eq!(max(&[1.0, 5.0, 3.0]), 5.0);
    }

    #[test]
    fn default_metrics_bind_value_to_the_pool() {
        let metrics = default_metrics();
        let names: Vec<&str> = metrics.iter().map(MetricKind::name).collect();
        assert_eq!(names, ["pool_value", "oracle_tracking"]);
        assert!(matches!(metrics[0], MetricKind::PoolBound(_)));
    }
}
