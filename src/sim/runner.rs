// src/sim/runner.rs

use super::sweep::apply_parameters;
use crate::errors::Result;
use crate::metrics::MetricKind;
use crate::pool::{Controller, LlammaPool};
use crate::prices::PriceSeries;
use crate::shared_types::SimMode;
use crate::state_log::parameters::RunParameters;
use crate::state_log::{MetricResults, StateLog};
use crate::types::{Value, Wad};
use serde::Serialize;
use tracing::debug;

/// Outcome of one parameter combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub parameters: RunParameters,
    pub results: MetricResults,
}

/// Runs one combination against private copies of `pool` and `controller`.
///
/// Bands are seeded for the mode before the oracle is prepared, then every
/// sample moves the oracle and is recorded with its volume and price.
pub fn run_one<P, C>(
    pool: &P,
    controller: &C,
    prices: &PriceSeries,
    mode: SimMode,
    parameters: RunParameters,
    total_y: Wad,
    metrics: Vec<MetricKind>,
) -> Result<RunOutput>
where
    P: LlammaPool + Clone,
    C: Controller + Clone,
{
    let mut pool = pool.clone();
    let mut controller = controller.clone();
    apply_parameters(&mut pool, &mut controller, &parameters)?;

    mode.bands_strategy(&parameters)?
        .initialize(&mut pool, &controller, prices, total_y)?;
    pool.prepare_for_run(prices, false);

    let mut log = StateLog::new(mode, &pool, &controller, metrics, &parameters);
    for sample in prices.iter() {
        pool.update_price_oracle(sample);
        log.update_with(
            &pool,
            &controller,
            sample,
            [
                ("volume", Value::Float(sample.volume)),
                ("price", Value::Float(sample.price)),
            ],
        );
    }

    let results = log.compute_metrics()?;
    debug!(?parameters, records = log.len(), "run finished");
    Ok(RunOutput {
        parameters,
        results,
    })
}
