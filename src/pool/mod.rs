// src/pool/mod.rs

//! The pool/controller boundary. The simulator only ever talks to a LLAMMA pool
//! and its loan controller through these traits; `SimLlamma` and
//! `SimController` are the in-crate reference implementations.

pub mod controller;
pub mod curve;
pub mod llamma;
pub mod oracle;

pub use controller::SimController;
pub use llamma::SimLlamma;
pub use oracle::PriceOracle;

use crate::prices::PriceSeries;
use crate::types::{PriceSample, Wad, from_wad};
use serde::Serialize;
use std::collections::BTreeMap;

/// A LLAMMA pool as seen by the simulator.
pub trait LlammaPool {
    // === Parameters ===
    fn a(&self) -> u64;
    fn fee(&self) -> Wad;
    fn admin_fee(&self) -> Wad;

    // === Band state ===
    fn min_band(&self) -> i64;
    fn max_band(&self) -> i64;
    fn active_band(&self) -> i64;
    fn bands_x(&self) -> &BTreeMap<i64, Wad>;
    fn bands_y(&self) -> &BTreeMap<i64, Wad>;

    // === Prices (fixed point) ===
    /// Upper oracle price of band `n`.
    fn p_oracle_up(&self, n: i64) -> Wad;
    /// Lower oracle price of band `n`; equals `p_oracle_up(n + 1)`.
    fn p_oracle_down(&self, n: i64) -> Wad;
    /// Current AMM price in the active band.
    fn get_p(&self) -> Wad;
    /// Last price held by the pool's price oracle.
    fn price_oracle(&self) -> Wad;

    // === Writes: seeding and the run loop ===
    /// Replaces the whole band layout and re-anchors the oracle in one call.
    fn seed_bands(&mut self, seed: BandSeed);
    fn prepare_for_run(&mut self, prices: &PriceSeries, keep_price: bool);
    fn update_price_oracle(&mut self, sample: &PriceSample);

    // === Sweep hooks ===
    fn set_a(&mut self, a: u64);
    fn set_fee(&mut self, fee: Wad);
    fn set_admin_fee(&mut self, admin_fee: Wad);

    fn total_x(&self) -> Wad {
        self.bands_x().values().sum()
    }

    fn total_y(&self) -> Wad {
        self.bands_y().values().sum()
    }

    /// Pool value in stablecoin units at the oracle price.
    fn value_at_oracle(&self) -> f64 {
        from_wad(self.total_x()) + from_wad(self.total_y()) * from_wad(self.price_oracle())
    }
}

/// A loan controller as seen by the simulator.
pub trait Controller {
    fn loan_discount(&self) -> Wad;
    fn liquidation_discount(&self) -> Wad;
    fn loans(&self) -> &[UserLoan];

    fn set_loan_discount(&mut self, v: Wad);
    fn set_liquidation_discount(&mut self, v: Wad);

    fn n_loans(&self) -> usize {
        self.loans().len()
    }

    fn total_debt(&self) -> Wad {
        self.loans().iter().map(|l| l.debt).sum()
    }

    fn total_collateral(&self) -> Wad {
        self.loans().iter().map(|l| l.collateral).sum()
    }
}

/// One outstanding loan: collateral deposited evenly over bands `n1..=n2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLoan {
    pub user: String,
    pub collateral: Wad,
    pub debt: Wad,
    pub n1: i64,
    pub n2: i64,
}

impl UserLoan {
    pub fn new(user: impl Into<String>, collateral: Wad, debt: Wad, n1: i64, n2: i64) -> Self {
        Self {
            user: user.into(),
            collateral,
            debt,
            n1,
            n2,
        }
    }

    /// Band range with the ends in ascending order.
    pub fn band_range(&self) -> (i64, i64) {
        (self.n1.min(self.n2), self.n1.max(self.n2))
    }
}

/// A complete initial band layout, written atomically by
/// [`LlammaPool::seed_bands`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSeed {
    pub min_band: i64,
    pub max_band: i64,
    pub active_band: i64,
    pub bands_x: BTreeMap<i64, Wad>,
    pub bands_y: BTreeMap<i64, Wad>,
    /// Oracle price the layout was computed against.
    pub initial_price: Wad,
    pub initial_timestamp: i64,
}

impl BandSeed {
    /// Layout value in stablecoin units at `price`.
    pub fn value_at(&self, price: Wad) -> f64 {
        let x: Wad = self.bands_x.values().sum();
        let y: Wad = self.bands_y.values().sum();
        from_wad(x) + from_wad(y) * from_wad(price)
    }
}
