// src/shared_types.rs

use crate::errors::{ConfigurationError, Result};
use crate::pool::{Controller, LlammaPool};
use crate::state_log::parameters::{
    ParameterSnapshot, RunParameters, get_controller_parameters, get_n_parameters,
    get_pool_parameters,
};
use crate::state_log::{StateData, StateExtractor, controller_state, pool_state};
use crate::strategy::BandsStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a simulation varies, and therefore what it records and how it seeds
/// the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimMode {
    /// Sweep pool parameters (`A`, `fee`, `admin_fee`).
    Pool,
    /// Sweep controller discounts.
    Controller,
    /// Sweep the number of bands a position is spread over.
    N,
}

impl SimMode {
    /// Parameters a sweep in this mode may vary.
    pub fn sweep_keys(self) -> &'static [&'static str] {
        match self {
            SimMode::Pool => &["A", "fee", "admin_fee"],
            SimMode::Controller => &["loan_discount", "liquidation_discount"],
            SimMode::N => &["N"],
        }
    }

    pub fn state_extractor(self) -> StateExtractor {
        match self {
            SimMode::Pool => pool_state_extractor,
            SimMode::Controller | SimMode::N => controller_state::get_controller_state,
        }
    }

    pub fn parameter_snapshot(
        self,
        pool: &dyn LlammaPool,
        controller: &dyn Controller,
        parameters: &RunParameters,
    ) -> ParameterSnapshot {
        match self {
            SimMode::Pool => get_pool_parameters(pool),
            SimMode::Controller => get_controller_parameters(controller),
            SimMode::N => get_n_parameters(pool, parameters),
        }
    }

    /// Band seeding for one run. N mode takes its band count from the run's
    /// parameters, or fits the price path when `N` is not swept.
    pub fn bands_strategy(self, parameters: &RunParameters) -> Result<BandsStrategy> {
        Ok(match self {
            SimMode::Pool => BandsStrategy::SingleUser,
            SimMode::Controller => BandsStrategy::UserLoans,
            SimMode::N => {
                let n = parameters
                    .get("N")
                    .map(|&n| {
                        u32::try_from(n).map_err(|_| ConfigurationError::OutOfRange {
                            key: "N".to_string(),
                            value: n,
                            expected: "1..=u32::MAX",
                        })
                    })
                    .transpose()?;
                BandsStrategy::NBands(n)
            }
        })
    }
}

fn pool_state_extractor(pool: &dyn LlammaPool, _controller: &dyn Controller) -> StateData {
    pool_state::get_pool_state(pool)
}

impl fmt::Display for SimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimMode::Pool => "pool",
            SimMode::Controller => "controller",
            SimMode::N => "N",
        };
        f.write_str(name)
    }
}

impl FromStr for SimMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pool" => Ok(SimMode::Pool),
            "controller" => Ok(SimMode::Controller),
            "N" | "n" => Ok(SimMode::N),
            other => Err(ConfigurationError::UnknownMode(other.to_string())),
        }
    }
}
