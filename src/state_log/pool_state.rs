// src/state_log/pool_state.rs

use super::StateData;
use crate::pool::LlammaPool;
use crate::types::{Value, from_wad};

/// Point-in-time pool state recorded once per trade in pool mode.
pub fn get_pool_state(pool: &dyn LlammaPool) -> StateData {
    StateData::from([
        ("active_band".to_string(), Value::Int(pool.active_band())),
        ("min_band".to_string(), Value::Int(pool.min_band())),
        ("max_band".to_string(), Value::Int(pool.max_band())),
        ("price_oracle".to_string(), Value::Float(from_wad(pool.price_oracle()))),
        ("amm_price".to_string(), Value::Float(from_wad(pool.get_p()))),
        ("bands_x".to_string(), Value::Bands(pool.bands_x().clone())),
        ("bands_y".to_string(), Value::Bands(pool.bands_y().clone())),
        ("total_x".to_string(), Value::Amount(pool.total_x())),
        ("total_y".to_string(), Value::Amount(pool.total_y())),
    ])
}
