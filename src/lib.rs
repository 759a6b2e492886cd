// src/lib.rs

// === 1. Declare all the top-level modules ===
pub mod config;
pub mod errors;
pub mod metrics;
pub mod pool;
pub mod prices;
pub mod shared_types;
pub mod sim;
pub mod state_log;
pub mod strategy;
pub mod table;
pub mod types;

// === 2. Re-export the public-facing components ===

// --- Errors and config ---
pub use config::SimConfig;
pub use errors::{ConfigurationError, DegenerateInputError, Result, SimError, TableError};

// --- Pool boundary ---
pub use pool::{BandSeed, Controller, LlammaPool, PriceOracle, SimController, SimLlamma, UserLoan};

// --- Prices ---
pub use prices::{GbmPriceGenerator, PriceSeries, generate_prices};
pub use types::{PriceSample, Value, WAD, Wad, from_wad, to_wad};

// --- Seeding and recording ---
pub use shared_types::SimMode;
pub use state_log::{MetricResults, StateLog, StateLogs, StateRecord};
pub use strategy::{BandsStrategy, band_of};

// --- Metrics ---
pub use metrics::{Metric, MetricKind, MetricOutput, OracleTracking, PoolMetric, PoolValue, default_metrics};

// --- Sweeps ---
pub use sim::{ParameterGrid, RunOutput, SweepResults, autosim, autosim_with_metrics, parse_sweep_params};
pub use table::Frame;
