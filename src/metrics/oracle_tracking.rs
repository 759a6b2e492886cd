// src/metrics/oracle_tracking.rs

use super::{Metric, MetricOutput, float_column, max, mean};
use crate::errors::Result;
use crate::state_log::StateLogs;
use crate::table::Frame;
use crate::types::Value;

/// Relative distance between the AMM price and the oracle price.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleTracking;

impl Metric for OracleTracking {
    fn name(&self) -> &str {
        "oracle_tracking"
    }

    fn compute(&self, logs: &StateLogs) -> Result<MetricOutput> {
        let amm = float_column(logs, self.name(), "amm_price")?;
        let oracle = float_column(logs, self.name(), "price_oracle")?;
        let errors: Vec<f64> = amm
            .iter()
            .zip(&oracle)
            .map(|(a, o)| if *o > 0.0 { (a - o).abs() / o } else { 0.0 })
            .collect();

        let mut per_trade = Frame::new(logs.state_data.index().to_vec());
        per_trade.push_column("price_error", errors.iter().copied().map(Value::Float).collect())?;
        let summary = Frame::single_row([
            ("price_error_mean", Value::Float(mean(&errors))),
            ("price_error_max", Value::Float(max(&errors))),
        ]);
        Ok(MetricOutput { per_trade, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SimError;

    #[test]
    fn relative_error_per_trade() {
        // Arrange
        let mut state = Frame::new(vec![0, 300]);
        state
            .push_column("amm_price", vec![Value::Float(2.0), Value::Float(2.2)])
            .unwrap();
        state
            .push_column("price_oracle", vec![Value::Float(2.0), Value::Float(2.0)])
            .unwrap();
        let logs = StateLogs {
            sim_parameters: Frame::default(),
            price_sample: Frame::new(vec![0, 300]),
            state_data: state,
            extra: Frame::new(vec![0, 300]),
        };

        // Act
        let out = OracleTracking.compute(&logs).unwrap();

        // Assert
        let errors = out.per_trade.column_f64("price_error").unwrap();
        assert_eq!(errors[0], 0.0);
        assert!((errors[1] - 0.1).abs() < 1e-12);
        let max_err = out.summary.column_f64("price_error_max").unwrap()[0];
        assert!((max_err - 0.1).abs() < 1e-12);
    }

    #[test]
    fn missing_columns_fail_the_metric() {
        let logs = StateLogs {
            sim_parameters: Frame::default(),
            price_sample: Frame::new(vec![0]),
            state_data: Frame::new(vec![0]),
            extra: Frame::new(vec![0]),
        };
        assert!(matches!(
            OracleTracking.compute(&logs),
            Err(SimError::Metric { .. })
        ));
    }
}
