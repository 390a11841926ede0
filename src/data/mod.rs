//! Series acquisition.
//!
//! - `parse`: the FRED plain-text format
//! - `fred`: HTTP client for the FRED text endpoint
//! - `synthetic`: seeded offline series for demos and tests

pub mod fred;
pub mod parse;
pub mod synthetic;

pub use fred::FredClient;
pub use parse::parse_series_text;
pub use synthetic::{SyntheticSpec, generate_synthetic};

use crate::domain::Series;
use crate::error::SeriesError;

/// Anything that can produce a populated series for an identifier.
///
/// Per-capita normalization calls back into this to load population data.
pub trait SeriesSource {
    fn fetch(&self, series_id: &str) -> Result<Series, SeriesError>;
}

/// A source with nothing behind it; every fetch is `SourceUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl SeriesSource for Offline {
    fn fetch(&self, series_id: &str) -> Result<Series, SeriesError> {
        Err(SeriesError::source_unavailable(series_id, "offline"))
    }
}
