// src/prices/gbm.rs

use super::PriceSeries;
use crate::config::{GBM_STEPS_PER_YEAR, SYNTHETIC_VOLUME_MAX, SYNTHETIC_VOLUME_MIN};
use crate::errors::{DegenerateInputError, Result};
use crate::types::PriceSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seeded geometric Brownian motion feed for synthetic runs.
pub struct GbmPriceGenerator {
    initial_price: f64,
    drift: f64,
    volatility: f64,
    /// Seconds between samples.
    interval: i64,
    seed: u64,
    current_price: f64,
    rng: StdRng,
}

impl GbmPriceGenerator {
    /// `drift` and `volatility` are annualized.
    pub fn new(initial_price: f64, drift: f64, volatility: f64, interval: i64, seed: u64) -> Self {
        Self {
            initial_price,
            drift,
            volatility,
            interval,
            seed,
            current_price: initial_price,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances one step and returns the new price.
    pub fn step(&mut self) -> f64 {
        let dt = 1.0 / GBM_STEPS_PER_YEAR;
        let random_shock: f64 = self.rng.sample(StandardNormal);
        let next_price = self.current_price
            * ((self.drift - 0.5 * self.volatility.powi(2)) * dt
                + self.volatility * random_shock * dt.sqrt())
            .exp();
        self.current_price = next_price;
        self.current_price
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Back to the initial price with the original seed, so a reset generator
    /// reproduces the same path.
    pub fn reset(&mut self) {
        self.current_price = self.initial_price;
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// `trade_count` samples starting at `start`; the first sample is the
    /// current price.
    pub fn series(&mut self, trade_count: usize, start: i64) -> Result<PriceSeries> {
        if trade_count == 0 {
            return Err(DegenerateInputError::NoTrades.into());
        }
        if !(self.initial_price > 0.0) || !self.initial_price.is_finite() {
            return Err(DegenerateInputError::InvalidPrice { timestamp: start }.into());
        }

        let mut samples = Vec::with_capacity(trade_count);
        let mut price = self.current_price;
        for i in 0..trade_count {
            if i > 0 {
                price = self.step();
            }
            let volume = self
                .rng
                .gen_range(SYNTHETIC_VOLUME_MIN..SYNTHETIC_VOLUME_MAX);
            samples.push(PriceSample::new(start + i as i64 * self.interval, price, volume));
        }
        Ok(PriceSeries::new(samples))
    }
}
