// src/bin/autosim.rs

//! Sweeps LLAMMA parameters over a synthetic price series and prints the
//! per-run metrics as JSON.
//!
//! ```bash
//! cargo run --bin autosim -- --mode pool -A 50,100,150 --fee 6000000000000000
//! ```

use clap::{Parser, ValueEnum};
use llamma_simulator::config::{
    DEFAULT_A, DEFAULT_ADMIN_FEE, DEFAULT_FEE, DEFAULT_LIQUIDATION_DISCOUNT, DEFAULT_LOAN_DISCOUNT,
    GBM_DEFAULT_VOLATILITY,
};
use llamma_simulator::{
    GbmPriceGenerator, PriceSeries, SimConfig, SimController, SimLlamma, SimMode, UserLoan, autosim,
    band_of, from_wad, generate_prices, to_wad,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Series {
    /// Straight line from `price_max` down by `dprice`.
    Linear,
    /// Seeded geometric Brownian motion from `price_max`.
    Gbm,
}

#[derive(Parser)]
#[command(name = "autosim")]
#[command(version, about = "LLAMMA parameter sweeps over synthetic prices", long_about = None)]
struct Cli {
    /// Simulation mode: pool, controller or N
    #[arg(long, default_value = "pool")]
    mode: SimMode,

    /// Amplification values to sweep (pool mode)
    #[arg(short = 'A', long = "A", value_delimiter = ',')]
    a: Vec<i64>,

    /// Fees to sweep, 10^18 = 100% (pool mode)
    #[arg(long, value_delimiter = ',')]
    fee: Vec<i64>,

    /// Admin fees to sweep (pool mode)
    #[arg(long, value_delimiter = ',')]
    admin_fee: Vec<i64>,

    /// Loan discounts to sweep (controller mode)
    #[arg(long, value_delimiter = ',')]
    loan_discount: Vec<i64>,

    /// Liquidation discounts to sweep (controller mode)
    #[arg(long, value_delimiter = ',')]
    liquidation_discount: Vec<i64>,

    /// Band counts to sweep (N mode)
    #[arg(short = 'N', long = "N", value_delimiter = ',')]
    n: Vec<i64>,

    /// JSON file with a `SimConfig`; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the reduced test grid instead of the sweep values
    #[arg(long)]
    test: bool,

    #[arg(long, value_enum, default_value = "linear")]
    series: Series,

    /// First (and, for `linear`, highest) price of the series
    #[arg(long, default_value = "2000")]
    price_max: f64,

    /// Price drop over a linear series
    #[arg(long, default_value = "400")]
    dprice: f64,

    /// Number of samples
    #[arg(long, default_value = "288")]
    trades: usize,

    /// Annualized GBM volatility
    #[arg(long, default_value_t = GBM_DEFAULT_VOLATILITY)]
    volatility: f64,

    /// Annualized GBM drift
    #[arg(long, default_value = "0")]
    drift: f64,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Unix timestamp of the first sample
    #[arg(long, default_value = "1700000000")]
    start: i64,

    /// Seed deposit in collateral units
    #[arg(long)]
    total_y: Option<f64>,

    /// Worker threads
    #[arg(long)]
    ncpu: Option<usize>,

    /// Number of sample loans given to the controller
    #[arg(long, default_value = "5")]
    loans: usize,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write results here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    config.test |= cli.test;
    if let Some(total_y) = cli.total_y {
        config.total_y = total_y;
    }
    if cli.ncpu.is_some() {
        config.ncpu = cli.ncpu;
    }
    for (key, values) in [
        ("A", &cli.a),
        ("fee", &cli.fee),
        ("admin_fee", &cli.admin_fee),
        ("loan_discount", &cli.loan_discount),
        ("liquidation_discount", &cli.liquidation_discount),
        ("N", &cli.n),
    ] {
        if !values.is_empty() {
            config
                .variable_params
                .insert(key.to_string(), serde_json::json!(values));
        }
    }

    let prices: PriceSeries = match cli.series {
        Series::Linear => generate_prices(cli.price_max, cli.dprice, cli.trades, cli.start)?,
        Series::Gbm => GbmPriceGenerator::new(
            cli.price_max,
            cli.drift,
            cli.volatility,
            llamma_simulator::config::DEFAULT_SAMPLE_INTERVAL,
            cli.seed,
        )
        .series(cli.trades, cli.start)?,
    };

    let pool = SimLlamma::new(DEFAULT_A, DEFAULT_FEE, DEFAULT_ADMIN_FEE, to_wad(cli.price_max));
    let controller = sample_controller(&pool, cli.loans)?;
    info!(
        mode = %cli.mode,
        samples = prices.len(),
        loans = cli.loans,
        "prepared inputs"
    );

    let results = autosim(&pool, &controller, &prices, cli.mode, &config)?;
    let json = serde_json::to_string_pretty(&results)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Staggered loans at 75% loan-to-value, each spread over ten bands from the
/// start price down.
fn sample_controller(pool: &SimLlamma, count: usize) -> llamma_simulator::Result<SimController> {
    let top = band_of(pool, pool.base_price())?;
    let price = from_wad(pool.base_price());
    let loans = (0..count as i64)
        .map(|i| {
            let n1 = top + 2 * i;
            let collateral = 10.0 + i as f64;
            let debt = collateral * price * 0.75;
            UserLoan::new(format!("user_{i}"), to_wad(collateral), to_wad(debt), n1, n1 + 9)
        })
        .collect();
    Ok(SimController::new(DEFAULT_LOAN_DISCOUNT, DEFAULT_LIQUIDATION_DISCOUNT).with_loans(loans))
}
