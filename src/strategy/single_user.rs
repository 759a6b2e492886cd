// src/strategy/single_user.rs

use super::{bracket, layout};
use crate::errors::Result;
use crate::pool::{BandSeed, LlammaPool};
use crate::prices::PriceSeries;
use crate::types::Wad;

/// One depositor, evenly over exactly the bands the price path crosses.
pub fn plan(pool: &dyn LlammaPool, prices: &PriceSeries, total_y: Wad) -> Result<BandSeed> {
    let bracket = bracket(pool, prices, total_y)?;
    let weights = vec![1.0; bracket.width() as usize];
    layout(
        pool,
        &bracket,
        bracket.top_band,
        bracket.bottom_band,
        &weights,
        total_y,
    )
}
