// src/strategy/user_loans.rs

use super::{bracket, layout};
use crate::config::LOAN_BOOK_WEIGHT;
use crate::errors::{DegenerateInputError, Result};
use crate::pool::{BandSeed, Controller, LlammaPool};
use crate::prices::PriceSeries;
use crate::types::{Wad, from_wad};

/// Mirrors the controller's outstanding loans.
///
/// The range covers the price bracket and every loan's bands. Each band gets
/// an even floor share of `1 - LOAN_BOOK_WEIGHT`; the rest follows the loans'
/// collateral, spread evenly over each loan's bands.
pub fn plan(
    pool: &dyn LlammaPool,
    controller: &dyn Controller,
    prices: &PriceSeries,
    total_y: Wad,
) -> Result<BandSeed> {
    let bracket = bracket(pool, prices, total_y)?;
    let loans = controller.loans();
    let book_collateral = from_wad(controller.total_collateral());
    if loans.is_empty() || book_collateral <= 0.0 {
        return Err(DegenerateInputError::EmptyLoanBook.into());
    }

    let (min_band, max_band) = loans.iter().map(|l| l.band_range()).fold(
        (bracket.top_band, bracket.bottom_band),
        |(lo, hi), (n1, n2)| (lo.min(n1), hi.max(n2)),
    );
    let width = (max_band - min_band + 1) as usize;

    let mut book = vec![0.0; width];
    for loan in loans {
        let (n1, n2) = loan.band_range();
        let per_band = from_wad(loan.collateral) / (n2 - n1 + 1) as f64;
        for n in n1..=n2 {
            book[(n - min_band) as usize] += per_band;
        }
    }

    let floor = (1.0 - LOAN_BOOK_WEIGHT) / width as f64;
    let weights: Vec<f64> = book
        .iter()
        .map(|c| floor + LOAN_BOOK_WEIGHT * c / book_collateral)
        .collect();

    layout(pool, &bracket, min_band, max_band, &weights, total_y)
}
