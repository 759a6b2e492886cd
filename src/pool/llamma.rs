// src/pool/llamma.rs

use super::curve;
use super::oracle::PriceOracle;
use super::{BandSeed, LlammaPool};
use crate::config::{DEFAULT_A, DEFAULT_ADMIN_FEE, DEFAULT_BASE_PRICE, DEFAULT_FEE};
use crate::prices::PriceSeries;
use crate::types::{PriceSample, Wad, from_wad, to_wad};
use std::collections::BTreeMap;

/// Reference LLAMMA pool: band geometry, band balances and a price oracle.
///
/// Band `n` spans oracle prices `(base_price * r^(n+1), base_price * r^n]`
/// with `r = (A - 1) / A`, so a higher index means a lower price.
#[derive(Debug, Clone, PartialEq)]
pub struct SimLlamma {
    a: u64,
    fee: Wad,
    admin_fee: Wad,
    base_price: Wad,
    active_band: i64,
    min_band: i64,
    max_band: i64,
    bands_x: BTreeMap<i64, Wad>,
    bands_y: BTreeMap<i64, Wad>,
    pub price_oracle_contract: PriceOracle,
}

impl SimLlamma {
    /// `a` must be at least 2.
    pub fn new(a: u64, fee: Wad, admin_fee: Wad, base_price: Wad) -> Self {
        Self {
            a,
            fee,
            admin_fee,
            base_price,
            active_band: 0,
            min_band: 0,
            max_band: 0,
            bands_x: BTreeMap::new(),
            bands_y: BTreeMap::new(),
            price_oracle_contract: PriceOracle::new(base_price),
        }
    }

    pub fn base_price(&self) -> Wad {
        self.base_price
    }

    fn band_ratio(&self) -> f64 {
        (self.a as f64 - 1.0) / self.a as f64
    }
}

impl Default for SimLlamma {
    fn default() -> Self {
        Self::new(DEFAULT_A, DEFAULT_FEE, DEFAULT_ADMIN_FEE, DEFAULT_BASE_PRICE)
    }
}

impl LlammaPool for SimLlamma {
    fn a(&self) -> u64 {
        self.a
    }

    fn fee(&self) -> Wad {
        self.fee
    }

    fn admin_fee(&self) -> Wad {
        self.admin_fee
    }

    fn min_band(&self) -> i64 {
        self.min_band
    }

    fn max_band(&self) -> i64 {
        self.max_band
    }

    fn active_band(&self) -> i64 {
        self.active_band
    }

    fn bands_x(&self) -> &BTreeMap<i64, Wad> {
        &self.bands_x
    }

    fn bands_y(&self) -> &BTreeMap<i64, Wad> {
        &self.bands_y
    }

    fn p_oracle_up(&self, n: i64) -> Wad {
        to_wad(from_wad(self.base_price) * self.band_ratio().powi(n as i32))
    }

    fn p_oracle_down(&self, n: i64) -> Wad {
        self.p_oracle_up(n + 1)
    }

    fn get_p(&self) -> Wad {
        let n = self.active_band;
        let x = from_wad(self.bands_x.get(&n).copied().unwrap_or(0));
        let y = from_wad(self.bands_y.get(&n).copied().unwrap_or(0));
        let p_o = from_wad(self.price_oracle());
        let p_up = from_wad(self.p_oracle_up(n));
        to_wad(curve::amm_price(self.a, x, y, p_o, p_up))
    }

    fn price_oracle(&self) -> Wad {
        self.price_oracle_contract.price_last
    }

    fn seed_bands(&mut self, seed: BandSeed) {
        self.min_band = seed.min_band;
        self.max_band = seed.max_band;
        self.active_band = seed.active_band;
        self.bands_x = seed.bands_x;
        self.bands_y = seed.bands_y;
        self.price_oracle_contract.price_last = seed.initial_price;
        self.price_oracle_contract.last_timestamp = seed.initial_timestamp;
    }

    fn prepare_for_run(&mut self, prices: &PriceSeries, keep_price: bool) {
        self.price_oracle_contract.prepare_for_run(prices, keep_price);
    }

    fn update_price_oracle(&mut self, sample: &PriceSample) {
        self.price_oracle_contract.update(sample);
    }

    fn set_a(&mut self, a: u64) {
        self.a = a;
    }

    fn set_fee(&mut self, fee: Wad) {
        self.fee = fee;
    }

    fn set_admin_fee(&mut self, admin_fee: Wad) {
        self.admin_fee = admin_fee;
    }
}
