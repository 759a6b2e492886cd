// src/types/price.rs

use serde::{Deserialize, Serialize};

/// Fixed-point amount or price, scaled by 10^18.
pub type Wad = u128;

pub const WAD: Wad = 1_000_000_000_000_000_000;

/// Float to fixed point. Non-positive and non-finite inputs map to zero.
#[inline]
pub fn to_wad(v: f64) -> Wad {
    if v.is_finite() && v > 0.0 {
        (v * 1e18) as Wad
    } else {
        0
    }
}

#[inline]
pub fn from_wad(v: Wad) -> f64 {
    v as f64 / 1e18
}

/// One row of a price/volume feed. The timestamp indexes everything recorded
/// for the trade that consumed this sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Unix seconds.
    pub timestamp: i64,
    pub price: f64,
    pub volume: f64,
}

impl PriceSample {
    pub fn new(timestamp: i64, price: f64, volume: f64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }

    #[inline]
    pub fn price_wad(&self) -> Wad {
        to_wad(self.price)
    }

    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && self.price_wad() > 0
    }
}
