// src/types/mod.rs

pub mod price;
pub mod value;

pub use price::{PriceSample, WAD, Wad, from_wad, to_wad};
pub use value::Value;
