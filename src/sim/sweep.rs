// src/sim/sweep.rs

//! Sweep parameter parsing and the Cartesian grid of runs.

use crate::config::MAX_A;
use crate::errors::{ConfigurationError, Result};
use crate::pool::{Controller, LlammaPool};
use crate::shared_types::SimMode;
use crate::state_log::parameters::RunParameters;
use crate::types::Wad;
use std::collections::BTreeMap;

/// Values to sweep, keyed by parameter name.
pub type SweepParams = BTreeMap<String, Vec<i64>>;

/// Validates raw sweep values for `mode`. Each value must be an integer or a
/// non-empty list of integers, and each key a parameter the mode can vary.
pub fn parse_sweep_params(
    mode: SimMode,
    raw: &serde_json::Map<String, serde_json::Value>,
) -> Result<SweepParams> {
    let mut params = SweepParams::new();
    for (key, value) in raw {
        if !mode.sweep_keys().contains(&key.as_str()) {
            return Err(ConfigurationError::UnexpectedParameter {
                key: key.clone(),
                mode: mode.to_string(),
            }
            .into());
        }

        let not_integer = || ConfigurationError::NotInteger { key: key.clone() };
        let values = match value {
            serde_json::Value::Number(n) => vec![n.as_i64().ok_or_else(not_integer)?],
            serde_json::Value::Array(items) => items
                .iter()
                .map(|v| v.as_i64().ok_or_else(not_integer))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            _ => return Err(not_integer().into()),
        };
        if values.is_empty() {
            return Err(ConfigurationError::EmptyParameter { key: key.clone() }.into());
        }
        for &v in &values {
            check_range(key, v)?;
        }
        params.insert(key.clone(), values);
    }
    Ok(params)
}

fn check_range(key: &str, value: i64) -> std::result::Result<(), ConfigurationError> {
    let (ok, expected) = match key {
        "A" => ((2..=MAX_A as i64).contains(&value), "2..=10000"),
        "N" => (value >= 1, ">= 1"),
        _ => (value >= 0, ">= 0"),
    };
    if ok {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            key: key.to_string(),
            value,
            expected,
        })
    }
}

/// Every combination of a [`SweepParams`], in key order with the last key
/// varying fastest. An empty sweep is a single run with no overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    params: SweepParams,
}

impl ParameterGrid {
    pub fn new(params: SweepParams) -> Self {
        Self { params }
    }

    pub fn len(&self) -> usize {
        self.params.values().map(Vec::len).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn combinations(&self) -> Vec<RunParameters> {
        self.params
            .iter()
            .fold(vec![RunParameters::new()], |acc, (key, values)| {
                acc.iter()
                    .flat_map(|partial| {
                        values.iter().map(move |v| {
                            let mut next = partial.clone();
                            next.insert(key.clone(), *v);
                            next
                        })
                    })
                    .collect()
            })
    }
}

/// Writes one run's parameters into the pool and controller. `N` is consumed
/// by band seeding instead.
pub fn apply_parameters(
    pool: &mut dyn LlammaPool,
    controller: &mut dyn Controller,
    parameters: &RunParameters,
) -> Result<()> {
    for (key, &value) in parameters {
        check_range(key, value)?;
        // non-negative after the range check
        let amount = value as Wad;
        match key.as_str() {
            "A" => pool.set_a(value as u64),
            "fee" => pool.set_fee(amount),
            "admin_fee" => pool.set_admin_fee(amount),
            "loan_discount" => controller.set_loan_discount(amount),
            "liquidation_discount" => controller.set_liquidation_discount(amount),
            "N" => {}
            other => {
                return Err(ConfigurationError::UnexpectedParameter {
                    key: other.to_string(),
                    mode: "any".to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}
