// src/strategy/mod.rs

//! Band-placement strategies that seed a pool's liquidity before a run.
//!
//! Every strategy first plans a complete [`BandSeed`] without touching the
//! pool, then writes it with a single [`LlammaPool::seed_bands`] call. A
//! rejected input therefore leaves the pool exactly as it was.

pub mod n_bands;
pub mod single_user;
pub mod user_loans;

use crate::config::MAX_A;
use crate::errors::{ConfigurationError, DegenerateInputError, Result};
use crate::pool::{BandSeed, Controller, LlammaPool, curve};
use crate::prices::PriceSeries;
use crate::types::{Wad, from_wad, to_wad};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandsStrategy {
    /// One depositor spread evenly over exactly the bands the price path crosses.
    SingleUser,
    /// Evenly over `N` bands from the top of the price path downwards.
    /// `None` uses exactly as many bands as the path crosses.
    NBands(Option<u32>),
    /// Follows the controller's outstanding loans.
    UserLoans,
}

impl BandsStrategy {
    /// Computes the layout this strategy would write. Pure.
    pub fn plan(
        &self,
        pool: &dyn LlammaPool,
        controller: &dyn Controller,
        prices: &PriceSeries,
        total_y: Wad,
    ) -> Result<BandSeed> {
        match *self {
            BandsStrategy::SingleUser => single_user::plan(pool, prices, total_y),
            BandsStrategy::NBands(n) => n_bands::plan(pool, prices, total_y, n),
            BandsStrategy::UserLoans => user_loans::plan(pool, controller, prices, total_y),
        }
    }

    /// Plans and writes the layout into `pool`.
    pub fn initialize(
        &self,
        pool: &mut dyn LlammaPool,
        controller: &dyn Controller,
        prices: &PriceSeries,
        total_y: Wad,
    ) -> Result<()> {
        let seed = self.plan(&*pool, controller, prices, total_y)?;
        debug!(
            strategy = ?self,
            min_band = seed.min_band,
            max_band = seed.max_band,
            active_band = seed.active_band,
            "seeding bands"
        );
        pool.seed_bands(seed);
        Ok(())
    }
}

/// Furthest band index from band 0 a price may map to.
const MAX_BAND_INDEX: f64 = 1_000_000.0;
/// Corrections allowed after the float guess before giving up.
const BAND_SEARCH_STEPS: usize = 64;

/// The band `n` with `p_oracle_down(n) < price <= p_oracle_up(n)`.
pub fn band_of(pool: &dyn LlammaPool, price: Wad) -> Result<i64> {
    check_amplification(pool.a())?;
    let unbandable = || DegenerateInputError::UnbandablePrice {
        price: from_wad(price),
    };

    let a = pool.a() as f64;
    let top = from_wad(pool.p_oracle_up(0));
    let guess = (top / from_wad(price)).ln() / (a / (a - 1.0)).ln();
    if !guess.is_finite() || guess.abs() > MAX_BAND_INDEX {
        return Err(unbandable().into());
    }

    // the float guess can land one band off at a boundary
    let mut n = guess.floor() as i64;
    for _ in 0..BAND_SEARCH_STEPS {
        if pool.p_oracle_down(n) >= price {
            n += 1;
        } else if pool.p_oracle_up(n) < price {
            n -= 1;
        } else {
            return Ok(n);
        }
    }
    Err(unbandable().into())
}

fn check_amplification(a: u64) -> Result<()> {
    if (2..=MAX_A).contains(&a) {
        return Ok(());
    }
    Err(ConfigurationError::OutOfRange {
        key: "A".to_string(),
        value: i64::try_from(a).unwrap_or(i64::MAX),
        expected: "2..=10000",
    }
    .into())
}

/// What a price path demands of the band layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PriceBracket {
    pub p0: Wad,
    pub timestamp0: i64,
    /// Band holding the highest price of the path.
    pub top_band: i64,
    /// Band holding the lowest price of the path.
    pub bottom_band: i64,
    /// Band holding the first price. It is `top_band` only when the path
    /// starts at its maximum; a later peak leaves stablecoin-only bands above it.
    pub active_band: i64,
}

impl PriceBracket {
    pub fn width(&self) -> u32 {
        (self.bottom_band - self.top_band + 1) as u32
    }
}

pub(crate) fn bracket(
    pool: &dyn LlammaPool,
    prices: &PriceSeries,
    total_y: Wad,
) -> Result<PriceBracket> {
    check_amplification(pool.a())?;
    let first = prices.first().ok_or(DegenerateInputError::EmptyPrices)?;
    if total_y == 0 {
        return Err(DegenerateInputError::ZeroDeposit.into());
    }
    if let Some(bad) = prices.iter().find(|s| !s.is_valid()) {
        return Err(DegenerateInputError::InvalidPrice {
            timestamp: bad.timestamp,
        }
        .into());
    }

    let p_max = prices.iter().map(|s| s.price_wad()).max().unwrap_or_default();
    let p_min = prices.iter().map(|s| s.price_wad()).min().unwrap_or_default();
    if p_max == p_min {
        return Err(DegenerateInputError::ZeroSpread { price: first.price }.into());
    }

    Ok(PriceBracket {
        p0: first.price_wad(),
        timestamp0: first.timestamp,
        top_band: band_of(pool, p_max)?,
        bottom_band: band_of(pool, p_min)?,
        active_band: band_of(pool, first.price_wad())?,
    })
}

/// Spreads `total_y * p0` worth of liquidity over `min_band..=max_band` in
/// proportion to `weights` (one positive weight per band).
///
/// Bands above the active band are fully converted to stablecoin, bands below
/// hold only collateral, and the active band holds the mix whose AMM price
/// equals `p0`. Fails if a band's share rounds to nothing on the side it
/// must hold.
pub(crate) fn layout(
    pool: &dyn LlammaPool,
    bracket: &PriceBracket,
    min_band: i64,
    max_band: i64,
    weights: &[f64],
    total_y: Wad,
) -> Result<BandSeed> {
    debug_assert_eq!(weights.len() as i64, max_band - min_band + 1);
    let p0 = from_wad(bracket.p0);
    let value = from_wad(total_y) * p0;
    let weight_sum: f64 = weights.iter().sum();

    let mut bands_x = BTreeMap::new();
    let mut bands_y = BTreeMap::new();
    for (n, weight) in (min_band..=max_band).zip(weights) {
        let share = value * weight / weight_sum;
        let side = n.cmp(&bracket.active_band);
        let (x, y) = match side {
            Ordering::Less => (share, 0.0),
            Ordering::Greater => (0.0, share / p0),
            Ordering::Equal => {
                let p_up = from_wad(pool.p_oracle_up(n));
                curve::balances_at_price(pool.a(), share, p0, p_up)
            }
        };
        let (x, y) = (to_wad(x), to_wad(y));
        let funded = match side {
            Ordering::Less => x > 0,
            Ordering::Greater => y > 0,
            Ordering::Equal => x > 0 || y > 0,
        };
        if !funded {
            return Err(DegenerateInputError::DepositTooSmall { total_y, band: n }.into());
        }
        bands_x.insert(n, x);
        bands_y.insert(n, y);
    }

    Ok(BandSeed {
        min_band,
        max_band,
        active_band: bracket.active_band,
        bands_x,
        bands_y,
        initial_price: bracket.p0,
        initial_timestamp: bracket.timestamp0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SimError;
    use crate::pool::{SimController, SimLlamma};
    use crate::types::{PriceSample, WAD};

    fn pool() -> SimLlamma {
        SimLlamma::new(100, 0, 0, 3 * WAD)
    }

    #[test]
    fn band_of_brackets_the_price() {
        let pool = pool();
        for price in [3.0, 2.999, 2.97, 2.5, 1.0, 3.5, 10.0] {
            let p = to_wad(price);
            let n = band_of(&pool, p).unwrap();
            assert!(pool.p_oracle_down(n) < p && p <= pool.p_oracle_up(n), "{price} not in band {n}");
        }
    }

    #[test]
    fn band_top_belongs_to_its_own_band() {
        let pool = pool();
        assert_eq!(band_of(&pool, pool.p_oracle_up(4)), Ok(4));
        assert_eq!(band_of(&pool, pool.p_oracle_up(0)), Ok(0));
    }

    #[test]
    fn band_of_rejects_flat_band_geometry() {
        // (A - 1) / A rounds to exactly 1.0 here, so every band has the same price
        let flat = SimLlamma::new(10u64.pow(17), 0, 0, 3 * WAD);
        let widest = SimLlamma::new(MAX_A, 0, 0, 3 * WAD);

        assert!(matches!(
            band_of(&flat, to_wad(2.5)),
            Err(SimError::Configuration(ConfigurationError::OutOfRange { .. }))
        ));
        let n = band_of(&widest, to_wad(2.5)).unwrap();
        assert!(widest.p_oracle_down(n) < to_wad(2.5) && to_wad(2.5) <= widest.p_oracle_up(n));
    }

    #[test]
    fn band_of_rejects_prices_beyond_the_band_range() {
        let pool = pool();
        assert_eq!(
            band_of(&pool, 0),
            Err(SimError::from(DegenerateInputError::UnbandablePrice { price: 0.0 }))
        );
    }

    #[test]
    fn bracket_rejects_degenerate_input() {
        let pool = pool();
        let flat = PriceSeries::new(vec![
            PriceSample::new(0, 2.0, 1.0),
            PriceSample::new(60, 2.0, 1.0),
        ]);
        let negative = PriceSeries::new(vec![
            PriceSample::new(0, 2.0, 1.0),
            PriceSample::new(60, -1.0, 1.0),
        ]);

        assert_eq!(
            bracket(&pool, &PriceSeries::default(), WAD),
            Err(SimError::from(DegenerateInputError::EmptyPrices))
        );
        assert_eq!(
            bracket(&pool, &flat, WAD),
            Err(SimError::from(DegenerateInputError::ZeroSpread { price: 2.0 }))
        );
        assert_eq!(
            bracket(&pool, &negative, WAD),
            Err(SimError::from(DegenerateInputError::InvalidPrice { timestamp: 60 }))
        );
        assert_eq!(
            bracket(&pool, &negative, 0),
            Err(SimError::from(DegenerateInputError::ZeroDeposit))
        );
    }

    #[test]
    fn dust_deposit_is_rejected_before_writing() {
        // Arrange
        let mut pool = pool();
        let before = pool.clone();
        let prices = crate::prices::generate_prices(3.0, 0.5, 20, 0).unwrap();

        // Act
        let result = BandsStrategy::SingleUser.initialize(&mut pool, &SimController::default(), &prices, 1);

        // Assert
        assert!(matches!(
            result,
            Err(SimError::DegenerateInput(DegenerateInputError::DepositTooSmall { total_y: 1, .. }))
        ));
        assert_eq!(pool, before, "nothing written");
    }

    #[test]
    fn initialize_writes_the_planned_layout() {
        let mut pool = pool();
        let controller = SimController::default();
        let prices = crate::prices::generate_prices(3.0, 0.5, 20, 0).unwrap();

        let planned = BandsStrategy::SingleUser
            .plan(&pool, &controller, &prices, 100 * WAD)
            .unwrap();
        BandsStrategy::SingleUser
            .initialize(&mut pool, &controller, &prices, 100 * WAD)
            .unwrap();

        assert_eq!(pool.bands_x(), &planned.bands_x);
        assert_eq!(pool.bands_y(), &planned.bands_y);
        assert_eq!(pool.active_band(), planned.active_band);
    }
}
