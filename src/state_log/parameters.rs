// src/state_log/parameters.rs

use crate::pool::{Controller, LlammaPool};
use crate::types::Value;
use std::collections::BTreeMap;

/// Sweep values of one run, keyed by parameter name.
pub type RunParameters = BTreeMap<String, i64>;

/// Run-level configuration captured once when a log is created.
pub type ParameterSnapshot = BTreeMap<String, Value>;

pub fn get_pool_parameters(pool: &dyn LlammaPool) -> ParameterSnapshot {
    ParameterSnapshot::from([
        ("A".to_string(), Value::Int(pool.a() as i64)),
        ("fee".to_string(), Value::Amount(pool.fee())),
        ("admin_fee".to_string(), Value::Amount(pool.admin_fee())),
    ])
}

pub fn get_controller_parameters(controller: &dyn Controller) -> ParameterSnapshot {
    ParameterSnapshot::from([
        ("loan_discount".to_string(), Value::Amount(controller.loan_discount())),
        (
            "liquidation_discount".to_string(),
            Value::Amount(controller.liquidation_discount()),
        ),
    ])
}

/// N mode records whatever the run varied. `N` is always present: when it
/// was not swept it is the band count the pool was seeded with.
pub fn get_n_parameters(pool: &dyn LlammaPool, parameters: &RunParameters) -> ParameterSnapshot {
    let mut snapshot: ParameterSnapshot = parameters
        .iter()
        .map(|(k, v)| (k.clone(), Value::Int(*v)))
        .collect();
    snapshot
        .entry("N".to_string())
        .or_insert(Value::Int(pool.max_band() - pool.min_band() + 1));
    snapshot
}
