//! Mathematical utilities: power-basis expansion and least-squares solvers.

pub mod basis;
pub mod ols;

pub use basis::*;
pub use ols::*;
