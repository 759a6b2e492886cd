// src/prices/synthetic.rs

use super::PriceSeries;
use crate::config::DEFAULT_SAMPLE_INTERVAL;
use crate::errors::{DegenerateInputError, Result};
use crate::types::PriceSample;

/// Builds a deterministic series that starts at `price_max` and walks linearly
/// down to `price_max - dprice` over `trade_count` samples, one sample every
/// [`DEFAULT_SAMPLE_INTERVAL`] seconds from `start`.
///
/// Starting at the top of the range is the conventional replay shape: a pool
/// seeded from such a series has its active band at the top of the seeded range.
pub fn generate_prices(
    price_max: f64,
    dprice: f64,
    trade_count: usize,
    start: i64,
) -> Result<PriceSeries> {
    if !(price_max > dprice) || !price_max.is_finite() || dprice < 0.0 {
        return Err(DegenerateInputError::InvalidRange { price_max, dprice }.into());
    }
    if trade_count == 0 {
        return Err(DegenerateInputError::NoTrades.into());
    }

    let price_min = price_max - dprice;
    let step = if trade_count > 1 {
        (price_max - price_min) / (trade_count - 1) as f64
    } else {
        0.0
    };

    let samples = (0..trade_count)
        .map(|i| {
            let price = if i + 1 == trade_count {
                price_min
            } else {
                price_max - step * i as f64
            };
            PriceSample::new(start + i as i64 * DEFAULT_SAMPLE_INTERVAL, price, 1.0)
        })
        .collect();
    Ok(PriceSeries::new(samples))
}
