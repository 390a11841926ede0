//! `fred-series` library crate.
//!
//! Fetches FRED economic time series and runs them through a pipeline of
//! transformations (growth rates, moving averages, trend/cycle filters,
//! frequency conversion, windowing, per-capita normalization, recession
//! annotation).
//!
//! The binary (`fred`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - transformations are reusable from other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod recession;
pub mod report;
pub mod transform;

pub use data::SeriesSource;
pub use domain::{Frequency, Series, SeriesMeta};
pub use error::{AppError, SeriesError};
