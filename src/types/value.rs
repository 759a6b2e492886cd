// src/types/value.rs

use super::price::{Wad, from_wad};
use serde::Serialize;
use std::collections::BTreeMap;

/// A single cell of recorded state or run parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    /// Fixed-point amount or price (10^18).
    Amount(Wad),
    Float(f64),
    /// Per-band balances keyed by band index.
    Bands(BTreeMap<i64, Wad>),
    Text(String),
    /// Field absent from this record.
    Null,
}

impl Value {
    /// Numeric view of the cell. Amounts are descaled from fixed point, band
    /// maps are summed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Amount(v) => Some(from_wad(*v)),
            Value::Float(v) => Some(*v),
            Value::Bands(bands) => Some(bands.values().map(|b| from_wad(*b)).sum()),
            Value::Text(_) | Value::Null => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bands(&self) -> Option<&BTreeMap<i64, Wad>> {
        match self {
            Value::Bands(bands) => Some(bands),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<Wad> for Value {
    fn from(v: Wad) -> Self {
        Value::Amount(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<BTreeMap<i64, Wad>> for Value {
    fn from(v: BTreeMap<i64, Wad>) -> Self {
        Value::Bands(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::WAD;

    #[test]
    fn numeric_view_descales_amounts_and_sums_bands() {
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::Amount(3 * WAD).as_f64(), Some(3.0));

        let bands = BTreeMap::from([(0, WAD), (1, 2 * WAD)]);
        assert_eq!(Value::Bands(bands).as_f64(), Some(3.0));

        assert_eq!(Value::Null.as_f64(), None);
        assert_eq!(Value::from("x").as_f64(), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::Int(1), Value::Float(0.5), Value::Null]).unwrap();
        assert_eq!(json, "[1,0.5,null]");
    }
}
