//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the `Series` store and its construction contract
//! - classification enums (`Frequency`, `Aggregation`, `Direction`, `Population`)
//! - derived outputs (`Smoothed`, `Decomposition`, `FirstDifference`, `RecessionBand`)
//! - non-fatal `Advisory` records

pub mod series;
pub mod types;

pub use series::*;
pub use types::*;
