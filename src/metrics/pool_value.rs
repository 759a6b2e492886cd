// src/metrics/pool_value.rs

use super::{Metric, MetricOutput, PoolMetric, float_column, mean, std_dev};
use crate::errors::{Result, SimError};
use crate::pool::LlammaPool;
use crate::state_log::StateLogs;
use crate::table::Frame;
use crate::types::Value;

/// Pool value in stablecoin units at the oracle price, per trade, relative
/// to its value when the run started.
#[derive(Debug, Clone, Default)]
pub struct PoolValue {
    baseline: Option<f64>,
}

impl PoolValue {
    const NAME: &'static str = "pool_value";

    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }
}

impl PoolMetric for PoolValue {
    fn set_pool(&mut self, pool: &dyn LlammaPool) {
        self.baseline = Some(pool.value_at_oracle());
    }
}

impl Metric for PoolValue {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn compute(&self, logs: &StateLogs) -> Result<MetricOutput> {
        let baseline = self.baseline.filter(|b| *b > 0.0).ok_or_else(|| SimError::Metric {
            metric: Self::NAME.to_string(),
            reason: "no pool bound, or pool was empty when bound".to_string(),
        })?;

        let x = float_column(logs, Self::NAME, "bands_x")?;
        let y = float_column(logs, Self::NAME, "bands_y")?;
        let p = float_column(logs, Self::NAME, "price_oracle")?;
        let values: Vec<f64> = x
            .iter()
            .zip(&y)
            .zip(&p)
            .map(|((x, y), p)| x + y * p)
            .collect();
        let last = values.last().copied().unwrap_or(baseline);

        let mut per_trade = Frame::new(logs.state_data.index().to_vec());
        per_trade.push_column(
            "pool_value",
            values.iter().copied().map(Value::Float).collect(),
        )?;
        let summary = Frame::single_row([
            ("pool_value_mean", Value::Float(mean(&values))),
            ("pool_value_std", Value::Float(std_dev(&values))),
            ("pool_value_change", Value::Float(last / baseline - 1.0)),
        ]);

        Ok(MetricOutput { per_trade, summary })
    }
}
