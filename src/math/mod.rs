//! Numerical utilities: least squares and a banded linear solver.

pub mod banded;
pub mod ols;

pub use banded::*;
pub use ols::*;
