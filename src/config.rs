// src/config.rs

//! A centralized place for simulation tuning parameters.

use crate::errors::{ConfigurationError, Result};
use crate::sim::sweep::SweepParams;
use crate::types::{WAD, Wad};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

// --- Reference pool ---
// Mainnet-like market defaults; sweeps override them per run.
pub const DEFAULT_A: u64 = 100;
/// Largest amplification the band geometry handles; above it `(A - 1) / A`
/// is too close to 1 for f64 band arithmetic.
pub const MAX_A: u64 = 10_000;
pub const DEFAULT_FEE: Wad = 6 * 10u128.pow(15);
pub const DEFAULT_ADMIN_FEE: Wad = 0;
pub const DEFAULT_BASE_PRICE: Wad = 2_000 * WAD;

// --- Reference controller ---
pub const DEFAULT_LOAN_DISCOUNT: Wad = 9 * 10u128.pow(16);
pub const DEFAULT_LIQUIDATION_DISCOUNT: Wad = 6 * 10u128.pow(16);

// --- Band seeding ---
pub const DEFAULT_TOTAL_Y: f64 = 10_000.0; // collateral units
/// Share of the seeded value that follows the controller's loan book; the
/// rest is spread evenly so every band of the price bracket is funded.
pub const LOAN_BOOK_WEIGHT: f64 = 0.9;

// --- Price series ---
pub const DEFAULT_PRICES_MAX_INTERVAL: i64 = 10 * 60;
pub const DEFAULT_SAMPLE_INTERVAL: i64 = 5 * 60;
pub const GBM_STEPS_PER_YEAR: f64 = 365.0 * 24.0 * 12.0; // 5 minute steps
pub const GBM_DEFAULT_VOLATILITY: f64 = 0.8;
pub const SYNTHETIC_VOLUME_MIN: f64 = 1_000.0;
pub const SYNTHETIC_VOLUME_MAX: f64 = 100_000.0;

/// Reduced grid used when a sweep runs in test mode.
pub static TEST_VARIABLE_PARAMS: Lazy<SweepParams> = Lazy::new(|| {
    SweepParams::from([
        ("A".to_string(), vec![50, 100]),
        ("fee".to_string(), vec![6 * 10i64.pow(15)]),
    ])
});

/// Run-level options for a sweep. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed deposit in collateral units.
    pub total_y: f64,
    /// Gaps wider than this (seconds) are linearly interpolated.
    pub prices_max_interval: i64,
    /// Worker threads; `None` uses the rayon default.
    pub ncpu: Option<usize>,
    /// Raw sweep values keyed by parameter name, validated per mode.
    pub variable_params: serde_json::Map<String, serde_json::Value>,
    /// Ignore `variable_params` and run [`TEST_VARIABLE_PARAMS`].
    pub test: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            total_y: DEFAULT_TOTAL_Y,
            prices_max_interval: DEFAULT_PRICES_MAX_INTERVAL,
            ncpu: None,
            variable_params: serde_json::Map::new(),
            test: false,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::File(e.to_string()).into())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::File(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimConfig::from_json_str(r#"{"total_y": 5.0, "variable_params": {"A": [50]}}"#)
            .unwrap();
        assert_eq!(cfg.total_y, 5.0);
        assert_eq!(cfg.prices_max_interval, DEFAULT_PRICES_MAX_INTERVAL);
        assert!(!cfg.test);
        assert!(cfg.variable_params.contains_key("A"));
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        assert!(matches!(
            SimConfig::from_json_str("{not json"),
            Err(crate::errors::SimError::Configuration(ConfigurationError::File(_)))
        ));
    }

    #[test]
    fn test_grid_has_two_amplifications() {
        assert_eq!(TEST_VARIABLE_PARAMS["A"], vec![50, 100]);
        assert_eq!(TEST_VARIABLE_PARAMS["fee"], vec![6_000_000_000_000_000]);
    }
}
