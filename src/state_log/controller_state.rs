// src/state_log/controller_state.rs

use super::StateData;
use crate::pool::{Controller, LlammaPool};
use crate::types::{Value, from_wad};

/// Point-in-time controller state, plus the pool fields the loan book depends
/// on. Recorded once per trade in controller and N modes.
pub fn get_controller_state(pool: &dyn LlammaPool, controller: &dyn Controller) -> StateData {
    StateData::from([
        ("total_debt".to_string(), Value::Amount(controller.total_debt())),
        ("n_loans".to_string(), Value::Int(controller.n_loans() as i64)),
        ("total_collateral".to_string(), Value::Amount(controller.total_collateral())),
        ("loan_discount".to_string(), Value::Amount(controller.loan_discount())),
        ("liquidation_discount".to_string(), Value::Amount(controller.liquidation_discount())),
        ("active_band".to_string(), Value::Int(pool.active_band())),
        ("price_oracle".to_string(), Value::Float(from_wad(pool.price_oracle()))),
        ("amm_price".to_string(), Value::Float(from_wad(pool.get_p()))),
        ("bands_x".to_string(), Value::Bands(pool.bands_x().clone())),
        ("bands_y".to_string(), Value::Bands(pool.bands_y().clone())),
    ])
}
