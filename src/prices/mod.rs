// src/prices/mod.rs

//! Time-indexed price/volume series replayed against the pool.

pub mod gbm;
pub mod synthetic;

pub use gbm::GbmPriceGenerator;
pub use synthetic::generate_prices;

use crate::errors::{DegenerateInputError, Result};
use crate::types::PriceSample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    pub fn new(samples: Vec<PriceSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&PriceSample> {
        self.samples.first()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn max_price(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.price).reduce(f64::max)
    }

    pub fn min_price(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.price).reduce(f64::min)
    }

    /// Inserts linearly interpolated samples wherever two consecutive samples
    /// are more than `max_interval` seconds apart. Interpolated samples carry
    /// zero volume.
    pub fn interpolate(&self, max_interval: i64) -> Result<PriceSeries> {
        if self.samples.is_empty() {
            return Err(DegenerateInputError::EmptyPrices.into());
        }
        if max_interval <= 0 {
            return Ok(self.clone());
        }

        let mut out = Vec::with_capacity(self.samples.len());
        for pair in self.samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            out.push(a);
            let gap = b.timestamp - a.timestamp;
            if gap <= max_interval {
                continue;
            }
            let mut ts = a.timestamp + max_interval;
            while ts < b.timestamp {
                let w = (ts - a.timestamp) as f64 / gap as f64;
                out.push(PriceSample::new(ts, a.price + (b.price - a.price) * w, 0.0));
                ts += max_interval;
            }
        }
        if let Some(last) = self.samples.last() {
            out.push(*last);
        }
        Ok(PriceSeries::new(out))
    }
}

impl From<Vec<PriceSample>> for PriceSeries {
    fn from(samples: Vec<PriceSample>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_ignore_order() {
        let series = PriceSeries::new(vec![
            PriceSample::new(0, 2.0, 1.0),
            PriceSample::new(60, 3.0, 1.0),
            PriceSample::new(120, 1.5, 1.0),
        ]);
        assert_eq!(series.max_price(), Some(3.0));
        assert_eq!(series.min_price(), Some(1.5));
        assert_eq!(PriceSeries::default().max_price(), None);
    }

    #[test]
    fn interpolate_fills_wide_gaps() {
        // Arrange: a 30 minute gap with a 10 minute cap
        let series = PriceSeries::new(vec![
            PriceSample::new(0, 1.0, 5.0),
            PriceSample::new(1800, 4.0, 7.0),
        ]);

        // Act
        let filled = series.interpolate(600).unwrap();

        // Assert
        let ts: Vec<i64> = filled.iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![0, 600, 1200, 1800]);
        assert!((filled.samples()[1].price - 2.0).abs() < 1e-12);
        assert!((filled.samples()[2].price - 3.0).abs() < 1e-12);
        assert_eq!(filled.samples()[1].volume, 0.0, "interpolated rows carry no volume");
        assert_eq!(filled.samples()[3].volume, 7.0);
    }

    #[test]
    fn interpolate_keeps_dense_series_unchanged() {
        let series = PriceSeries::new(vec![
            PriceSample::new(0, 1.0, 1.0),
            PriceSample::new(300, 1.1, 1.0),
        ]);
        assert_eq!(series.interpolate(600).unwrap(), series);
    }

    #[test]
    fn interpolate_rejects_empty_series() {
        assert!(PriceSeries::default().interpolate(600).is_err());
    }
}
