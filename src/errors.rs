// src/errors.rs

use thiserror::Error;

/// Invalid run or sweep configuration. Raised while parsing, before any run starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unrecognized sim mode `{0}` (expected pool, controller or N)")]
    UnknownMode(String),
    #[error("argument {key} must be an int or iterable of ints")]
    NotInteger { key: String },
    #[error("argument {key} is not a sweep parameter in {mode} mode")]
    UnexpectedParameter { key: String, mode: String },
    #[error("argument {key} has no values")]
    EmptyParameter { key: String },
    #[error("argument {key} = {value} is out of range ({expected})")]
    OutOfRange {
        key: String,
        value: i64,
        expected: &'static str,
    },
    #[error("invalid config file: {0}")]
    File(String),
    #[error("worker pool: {0}")]
    ThreadPool(String),
}

/// Inputs a band seed or price generator cannot work with. Always detected
/// before any pool state is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DegenerateInputError {
    #[error("price series is empty")]
    EmptyPrices,
    #[error("non-positive or non-finite price at timestamp {timestamp}")]
    InvalidPrice { timestamp: i64 },
    #[error("price range collapses to zero spread at {price}")]
    ZeroSpread { price: f64 },
    #[error("price_max ({price_max}) must exceed dprice ({dprice})")]
    InvalidRange { price_max: f64, dprice: f64 },
    #[error("seed deposit must be positive")]
    ZeroDeposit,
    #[error("{requested} bands cannot bracket the price path, {required} needed")]
    InsufficientBands { requested: u32, required: u32 },
    #[error("controller has no outstanding collateral to mirror")]
    EmptyLoanBook,
    #[error("deposit of {total_y} wei leaves band {band} empty")]
    DepositTooSmall { total_y: u128, band: i64 },
    #[error("price {price} lies outside any representable band")]
    UnbandablePrice { price: f64 },
    #[error("trade count must be at least one")]
    NoTrades,
}

/// Shape errors from [`crate::table::Frame`] operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("column `{name}` has {got} rows, frame index has {expected}")]
    ColumnLength {
        name: String,
        got: usize,
        expected: usize,
    },
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("frames have different indexes")]
    IndexMismatch,
}

/// Main simulator error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("degenerate input: {0}")]
    DegenerateInput(#[from] DegenerateInputError),

    /// Finalization was requested before any `update` call.
    #[error("no state recorded: finalization requires at least one update")]
    EmptyRun,

    #[error("metric {metric} failed: {reason}")]
    Metric { metric: String, reason: String },

    #[error("table error: {0}")]
    Table(#[from] TableError),
}

pub type Result<T> = std::result::Result<T, SimError>;
