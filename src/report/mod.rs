//! Terminal reports for series.

pub mod format;

pub use format::*;
