// src/strategy/n_bands.rs

use super::{bracket, layout};
use crate::errors::{DegenerateInputError, Result};
use crate::pool::{BandSeed, LlammaPool};
use crate::prices::PriceSeries;
use crate::types::Wad;

/// Evenly over `n` bands starting at the band of the path's highest price.
/// `n` must be wide enough to reach the lowest price; `None` takes exactly
/// that width.
pub fn plan(
    pool: &dyn LlammaPool,
    prices: &PriceSeries,
    total_y: Wad,
    n: Option<u32>,
) -> Result<BandSeed> {
    let bracket = bracket(pool, prices, total_y)?;
    let required = bracket.width();
    let n = n.unwrap_or(required);
    if n < required {
        return Err(DegenerateInputError::InsufficientBands {
            requested: n,
            required,
        }
        .into());
    }

    let min_band = bracket.top_band;
    let max_band = min_band + n as i64 - 1;
    let weights = vec![1.0; n as usize];
    layout(pool, &bracket, min_band, max_band, &weights, total_y)
}
