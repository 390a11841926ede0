//! Series transformations.
//!
//! Destructive operations replace the primary axes and clear derived outputs:
//! percent change, log, frequency conversion, windowing, per-capita.
//! Smoothing and the trend/cycle filters write into `Series::derived()` and
//! leave the primary axes alone.

pub mod filters;
pub mod frequency;
pub mod per_capita;
pub mod percent;
pub mod smooth;
pub mod window;

pub use filters::{
    BandPass, ChristianoFitzgerald, HP_LAMBDA_ANNUAL, HP_LAMBDA_MONTHLY, HP_LAMBDA_QUARTERLY, hp_implied_frequency,
    hp_lambda_for,
};
pub use percent::PercentChange;
pub use window::{common_window, window_equalize};
