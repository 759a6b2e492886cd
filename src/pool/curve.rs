// src/pool/curve.rs

//! Single-band LLAMMA invariant, in float units (descaled from 10^18).
//!
//! Within band `n` at oracle price `p_o`, with `p_up = p_oracle_up(n)`:
//!
//! ```text
//! f = A * y0 * p_o^2 / p_up
//! g = (A - 1) * y0 * p_up / p_o
//! (f + x) * (g + y) = A^2 * y0^2 * p_o
//! ```
//!
//! and the AMM price is `(f + x) / (g + y)`. Only what band seeding and price
//! reads need lives here; there is no swap logic.

/// Band capacity `y0` for balances `(x, y)`.
pub fn get_y0(a: u64, x: f64, y: f64, p_o: f64, p_up: f64) -> f64 {
    let a = a as f64;
    let mut b = 0.0;
    if x > 0.0 {
        b += p_up * (a - 1.0) * x / p_o;
    }
    if y > 0.0 {
        b += a * p_o * p_o / p_up * y;
    }
    if x > 0.0 && y > 0.0 {
        let d = b * b + 4.0 * a * p_o * x * y;
        (b + d.sqrt()) / (2.0 * a * p_o)
    } else {
        b / (a * p_o)
    }
}

/// AMM price of a band holding `(x, y)`.
pub fn amm_price(a: u64, x: f64, y: f64, p_o: f64, p_up: f64) -> f64 {
    let af = a as f64;
    let p_down = p_up * (af - 1.0) / af;
    let p_o3 = p_o * p_o * p_o;
    match (x > 0.0, y > 0.0) {
        // empty band: geometric middle of its AMM range
        (false, false) => p_o3 / (p_up * p_down),
        // all collateral: bottom of the band
        (false, true) => p_o3 / (p_up * p_up),
        // all stablecoin: top of the band
        (true, false) => p_o3 / (p_down * p_down),
        (true, true) => {
            let y0 = get_y0(a, x, y, p_o, p_up);
            let f = af * y0 * p_o * p_o / p_up;
            let g = (af - 1.0) * y0 * p_up / p_o;
            (f + x) / (g + y)
        }
    }
}

/// Balances `(x, y)` of a band worth `value` (stablecoin units) whose AMM
/// price equals the oracle price `p`. Requires `p_down <= p <= p_up`.
pub fn balances_at_price(a: u64, value: f64, p: f64, p_up: f64) -> (f64, f64) {
    let af = a as f64;
    let cx = (af * p * (1.0 - p / p_up)).max(0.0);
    let cy = (af - (af - 1.0) * p_up / p).max(0.0);
    let y0 = value / (cx + cy * p);
    (cx * y0, cy * y0)
}
