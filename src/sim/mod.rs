// src/sim/mod.rs

//! Parameter sweeps: one seeded, recorded run per grid combination.

pub mod runner;
pub mod sweep;

pub use runner::{RunOutput, run_one};
pub use sweep::{ParameterGrid, SweepParams, apply_parameters, parse_sweep_params};

use crate::config::{SimConfig, TEST_VARIABLE_PARAMS};
use crate::errors::{ConfigurationError, Result};
use crate::metrics::{MetricKind, default_metrics};
use crate::pool::{Controller, LlammaPool};
use crate::prices::PriceSeries;
use crate::shared_types::SimMode;
use crate::types::to_wad;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResults {
    pub mode: SimMode,
    /// One entry per grid combination, in grid order.
    pub runs: Vec<RunOutput>,
}

/// Sweeps `config.variable_params` (or the test grid) over copies of `pool`
/// and `controller`, reporting [`default_metrics`] for every run.
pub fn autosim<P, C>(
    pool: &P,
    controller: &C,
    prices: &PriceSeries,
    mode: SimMode,
    config: &SimConfig,
) -> Result<SweepResults>
where
    P: LlammaPool + Clone + Sync,
    C: Controller + Clone + Sync,
{
    autosim_with_metrics(pool, controller, prices, mode, config, default_metrics)
}

/// [`autosim`] with a custom metric set; `metrics` is called once per run.
pub fn autosim_with_metrics<P, C, F>(
    pool: &P,
    controller: &C,
    prices: &PriceSeries,
    mode: SimMode,
    config: &SimConfig,
    metrics: F,
) -> Result<SweepResults>
where
    P: LlammaPool + Clone + Sync,
    C: Controller + Clone + Sync,
    F: Fn() -> Vec<MetricKind> + Sync,
{
    let sweep = if config.test {
        warn!("test mode: ignoring variable_params");
        test_params(mode)
    } else {
        parse_sweep_params(mode, &config.variable_params)?
    };
    let grid = ParameterGrid::new(sweep);
    let prices = prices.interpolate(config.prices_max_interval)?;
    let total_y = to_wad(config.total_y);

    info!(
        %mode,
        runs = grid.len(),
        samples = prices.len(),
        "starting sweep"
    );

    let run_all = || {
        grid.combinations()
            .into_par_iter()
            .map(|params| run_one(pool, controller, &prices, mode, params, total_y, metrics()))
            .collect::<Result<Vec<_>>>()
    };
    let runs = match config.ncpu {
        Some(ncpu) => rayon::ThreadPoolBuilder::new()
            .num_threads(ncpu)
            .build()
            .map_err(|e| ConfigurationError::ThreadPool(e.to_string()))?
            .install(run_all)?,
        None => run_all()?,
    };

    info!(%mode, runs = runs.len(), "sweep finished");
    Ok(SweepResults { mode, runs })
}

/// The reduced test grid, restricted to what `mode` can vary.
fn test_params(mode: SimMode) -> SweepParams {
    TEST_VARIABLE_PARAMS
        .iter()
        .filter(|(key, _)| mode.sweep_keys().contains(&key.as_str()))
        .map(|(key, values)| (key.clone(), values.clone()))
        .collect()
}
