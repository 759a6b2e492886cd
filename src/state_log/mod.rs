// src/state_log/mod.rs

//! Per-run recorder: one [`StateRecord`] per simulated trade, reduced at the
//! end of the run into time-indexed tables and metric outputs.

pub mod controller_state;
pub mod parameters;
pub mod pool_state;

use crate::errors::{Result, SimError, TableError};
use crate::metrics::MetricKind;
use crate::pool::{Controller, LlammaPool};
use crate::shared_types::SimMode;
use crate::table::Frame;
use crate::types::{PriceSample, Value};
use parameters::{ParameterSnapshot, RunParameters};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Flat state read from the pool (and controller) at one point in time.
pub type StateData = BTreeMap<String, Value>;

/// Reads the mode-specific state of a pool and its controller. Never mutates.
pub type StateExtractor = fn(&dyn LlammaPool, &dyn Controller) -> StateData;

/// One observation, appended once per trade and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRecord {
    pub price_sample: PriceSample,
    pub state_data: StateData,
    /// Caller-supplied fields merged in at `update` time (volume, trade price...).
    pub extra: BTreeMap<String, Value>,
}

impl StateRecord {
    pub fn timestamp(&self) -> i64 {
        self.price_sample.timestamp
    }
}

/// Reduced view of a run, every table indexed by the sample timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateLogs {
    /// Single-row table of the run's parameter snapshot.
    pub sim_parameters: Frame,
    /// `price` and `volume` of the sample each record was taken at.
    pub price_sample: Frame,
    /// One column per state field.
    pub state_data: Frame,
    /// One column per caller-supplied field; missing cells are null.
    pub extra: Frame,
}

/// Everything a finished run reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResults {
    pub sim_parameters: Frame,
    /// Every metric's per-trade columns side by side.
    pub per_trade: Frame,
    /// Every metric's summary values side by side, one row.
    pub summary: Frame,
    pub state_data: Frame,
}

impl MetricResults {
    /// `(sim_parameters, per_trade, summary, state_data)`.
    pub fn into_parts(self) -> (Frame, Frame, Frame, Frame) {
        (self.sim_parameters, self.per_trade, self.summary, self.state_data)
    }
}

pub struct StateLog {
    mode: SimMode,
    extract: StateExtractor,
    metrics: Vec<MetricKind>,
    state_per_run: ParameterSnapshot,
    state_per_trade: Vec<StateRecord>,
}

impl StateLog {
    /// Captures the run's parameter snapshot and binds every pool-bound
    /// metric to `pool` as it stands now, so construct the log after the
    /// bands are seeded.
    pub fn new(
        mode: SimMode,
        pool: &dyn LlammaPool,
        controller: &dyn Controller,
        mut metrics: Vec<MetricKind>,
        parameters: &RunParameters,
    ) -> Self {
        for metric in &mut metrics {
            metric.bind_pool(pool);
        }
        let state_per_run = mode.parameter_snapshot(pool, controller, parameters);
        debug!(
            %mode,
            metrics = metrics.len(),
            parameters = ?state_per_run.keys().collect::<Vec<_>>(),
            "state log created"
        );
        Self {
            mode,
            extract: mode.state_extractor(),
            metrics,
            state_per_run,
            state_per_trade: Vec::new(),
        }
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn parameters(&self) -> &ParameterSnapshot {
        &self.state_per_run
    }

    /// Records the state of `pool`/`controller` at `sample`.
    pub fn update(
        &mut self,
        pool: &dyn LlammaPool,
        controller: &dyn Controller,
        sample: &PriceSample,
    ) {
        self.update_with(pool, controller, sample, std::iter::empty::<(String, Value)>());
    }

    /// Like [`update`](Self::update), also storing caller fields alongside
    /// the extracted state.
    pub fn update_with<I, K, V>(
        &mut self,
        pool: &dyn LlammaPool,
        controller: &dyn Controller,
        sample: &PriceSample,
        extra: I,
    ) where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let record = StateRecord {
            price_sample: *sample,
            state_data: (self.extract)(pool, controller),
            extra: extra.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        };
        trace!(timestamp = sample.timestamp, "state recorded");
        self.state_per_trade.push(record);
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.state_per_trade
    }

    pub fn len(&self) -> usize {
        self.state_per_trade.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state_per_trade.is_empty()
    }

    /// Reduces the records into tables. Pure; fails on a run with no records.
    pub fn get_logs(&self) -> Result<StateLogs> {
        if self.state_per_trade.is_empty() {
            return Err(SimError::EmptyRun);
        }
        let index: Vec<i64> = self.state_per_trade.iter().map(StateRecord::timestamp).collect();

        let sim_parameters = Frame::single_row(
            self.state_per_run
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let mut price_sample = Frame::new(index.clone());
        price_sample.push_column(
            "price",
            self.state_per_trade
                .iter()
                .map(|r| Value::Float(r.price_sample.price))
                .collect(),
        )?;
        price_sample.push_column(
            "volume",
            self.state_per_trade
                .iter()
                .map(|r| Value::Float(r.price_sample.volume))
                .collect(),
        )?;

        let state_data =
            Frame::from_rows(index.clone(), self.state_per_trade.iter().map(|r| &r.state_data));
        let extra = Frame::from_rows(index, self.state_per_trade.iter().map(|r| &r.extra));

        Ok(StateLogs {
            sim_parameters,
            price_sample,
            state_data,
            extra,
        })
    }

    /// Runs every metric over [`get_logs`](Self::get_logs) and joins their
    /// outputs. Any metric failure fails the whole call, and so does a metric
    /// whose column names another metric already produced.
    pub fn compute_metrics(&self) -> Result<MetricResults> {
        let logs = self.get_logs()?;

        let mut per_trade = Frame::new(logs.state_data.index().to_vec());
        let mut summary = Frame::new(vec![0]);
        for metric in &self.metrics {
            let output = metric.compute(&logs)?;
            let clash = |e: TableError| match e {
                TableError::DuplicateColumn(column) => SimError::Metric {
                    metric: metric.name().to_string(),
                    reason: format!("column `{column}` is already produced by another metric"),
                },
                other => other.into(),
            };
            per_trade.append(output.per_trade).map_err(clash)?;
            summary.append(output.summary).map_err(clash)?;
        }

        Ok(MetricResults {
            per_trade,
            summary,
            sim_parameters: logs.sim_parameters,
            state_data: logs.state_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{PoolValue, default_metrics};
    use crate::pool::{SimController, SimLlamma, UserLoan};
    use crate::prices::generate_prices;
    use crate::strategy::BandsStrategy;
    use crate::types::WAD;

    fn seeded() -> (SimLlamma, SimController, crate::prices::PriceSeries) {
        let mut pool = SimLlamma::new(100, 6 * 10u128.pow(15), 0, 3 * WAD);
        let controller = SimController::default()
            .with_loans(vec![UserLoan::new("alice", 10 * WAD, 15 * WAD, 2, 12)]);
        let prices = generate_prices(3.0, 0.5, 12, 1_700_000_000).unwrap();
        BandsStrategy::SingleUser
            .initialize(&mut pool, &controller, &prices, 100 * WAD)
            .unwrap();
        (pool, controller, prices)
    }

    fn run(mode: SimMode) -> StateLog {
        let (mut pool, controller, prices) = seeded();
        let mut log = StateLog::new(
            mode,
            &pool,
            &controller,
            default_metrics(),
            &RunParameters::new(),
        );
        for sample in prices.iter() {
            pool.update_price_oracle(sample);
            log.update_with(&pool, &controller, sample, [("volume", sample.volume)]);
        }
        log
    }

    #[test]
    fn one_row_per_update() {
        // Arrange
        let log = run(SimMode::Pool);

        // Act
        let logs = log.get_logs().unwrap();

        // Assert
        assert_eq!(log.len(), 12);
        assert_eq!(logs.state_data.len(), 12, "state series has one entry per update");
        assert_eq!(logs.price_sample.len(), 12);
        assert_eq!(logs.extra.column("volume").map(<[Value]>::len), Some(12));
        let mut index = logs.state_data.index().to_vec();
        index.dedup();
        assert_eq!(index.len(), 12, "timestamps are distinct");
        assert_eq!(logs.sim_parameters.len(), 1);
    }

    #[test]
    fn finalizing_twice_is_identical() {
        let log = run(SimMode::Pool);
        let first = log.compute_metrics().unwrap();
        let second = log.compute_metrics().unwrap();
        assert_eq!(first, second);
        assert_eq!(log.get_logs().unwrap(), log.get_logs().unwrap());
    }

    #[test]
    fn empty_run_is_rejected() {
        let (pool, controller, _) = seeded();
        let log = StateLog::new(
            SimMode::Pool,
            &pool,
            &controller,
            default_metrics(),
            &RunParameters::new(),
        );

        assert_eq!(log.get_logs(), Err(SimError::EmptyRun));
        assert_eq!(log.compute_metrics(), Err(SimError::EmptyRun));
    }

    #[test]
    fn record_shape_follows_the_mode() {
        let pool_logs = run(SimMode::Pool).get_logs().unwrap();
        let controller_logs = run(SimMode::Controller).get_logs().unwrap();

        assert!(pool_logs.state_data.column("total_x").is_some());
        assert!(pool_logs.state_data.column("total_debt").is_none());
        assert_eq!(
            controller_logs.state_data.column("n_loans").map(|c| c[0].clone()),
            Some(Value::Int(1))
        );
        assert!(pool_logs.sim_parameters.column("A").is_some());
        assert!(controller_logs.sim_parameters.column("loan_discount").is_some());
    }

    #[test]
    fn metrics_are_concatenated_side_by_side() {
        let results = run(SimMode::Pool).compute_metrics().unwrap();

        let names: Vec<&str> = results.summary.column_names().collect();
        assert!(names.contains(&"pool_value_change"), "{names:?}");
        assert!(names.contains(&"price_error_max"), "{names:?}");
        assert_eq!(results.summary.len(), 1);
        assert_eq!(results.per_trade.len(), 12);

        let (params, per_trade, summary, state) = results.into_parts();
        assert_eq!(params.len(), 1);
        assert_eq!(per_trade.index(), state.index());
        assert_eq!(summary.index(), &[0]);
    }

    #[test]
    fn no_metrics_yields_empty_tables_on_the_run_index() {
        let (pool, controller, prices) = seeded();
        let mut log = StateLog::new(SimMode::N, &pool, &controller, Vec::new(), &RunParameters::new());
        for sample in prices.iter().take(3) {
            log.update(&pool, &controller, sample);
        }

        let results = log.compute_metrics().unwrap();

        assert_eq!(results.per_trade.len(), 3);
        assert_eq!(results.per_trade.columns().len(), 0);
        assert_eq!(results.summary.columns().len(), 0);
    }

    #[test]
    fn metrics_with_clashing_columns_are_reported_by_name() {
        // Arrange
        let (mut pool, controller, prices) = seeded();
        let metrics = vec![
            MetricKind::PoolBound(Box::new(PoolValue::default())),
            MetricKind::PoolBound(Box::new(PoolValue::default())),
        ];
        let mut log = StateLog::new(SimMode::Pool, &pool, &controller, metrics, &RunParameters::new());
        for sample in prices.iter() {
            pool.update_price_oracle(sample);
            log.update(&pool, &controller, sample);
        }

        // Act
        let result = log.compute_metrics();

        // Assert
        match result {
            Err(SimError::Metric { metric, reason }) => {
                assert_eq!(metric, "pool_value");
                assert!(reason.contains("pool_value"), "reason names the column: {reason}");
            }
            other => panic!("expected a metric clash, got {other:?}"),
        }
    }
}
