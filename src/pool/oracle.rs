// src/pool/oracle.rs

use crate::prices::PriceSeries;
use crate::types::{PriceSample, Wad};

/// Price oracle feeding the reference pool. It holds the last observed price;
/// the run loop pushes one sample per trade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceOracle {
    pub price_last: Wad,
    pub last_timestamp: i64,
}

impl PriceOracle {
    pub fn new(price: Wad) -> Self {
        Self {
            price_last: price,
            last_timestamp: 0,
        }
    }

    /// Anchors the oracle to the first sample of `prices`. With `keep_price`
    /// only the timestamp moves, so a seeded price survives.
    pub fn prepare_for_run(&mut self, prices: &PriceSeries, keep_price: bool) {
        let Some(first) = prices.first() else {
            return;
        };
        if !keep_price {
            self.price_last = first.price_wad();
        }
        self.last_timestamp = first.timestamp;
    }

    pub fn update(&mut self, sample: &PriceSample) {
        self.price_last = sample.price_wad();
        self.last_timestamp = sample.timestamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WAD;

    fn series() -> PriceSeries {
        PriceSeries::new(vec![
            PriceSample::new(1_000, 2.5, 1.0),
            PriceSample::new(1_300, 2.4, 1.0),
        ])
    }

    #[test]
    fn prepare_takes_first_price_and_timestamp() {
        let mut oracle = PriceOracle::new(7 * WAD);
        oracle.prepare_for_run(&series(), false);
        assert_eq!(oracle.price_last, 2 * WAD + WAD / 2);
        assert_eq!(oracle.last_timestamp, 1_000);
    }

    #[test]
    fn keep_price_only_moves_the_timestamp() {
        let mut oracle = PriceOracle::new(7 * WAD);
        oracle.prepare_for_run(&series(), true);
        assert_eq!(oracle.price_last, 7 * WAD);
        assert_eq!(oracle.last_timestamp, 1_000);
    }

    #[test]
    fn empty_series_leaves_oracle_untouched() {
        let mut oracle = PriceOracle::new(7 * WAD);
        oracle.prepare_for_run(&PriceSeries::default(), false);
        assert_eq!(oracle, PriceOracle::new(7 * WAD));
    }
}
