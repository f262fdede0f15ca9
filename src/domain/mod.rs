//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`Metric`, `ForecastKind`)
//! - series observations and forecast output rows
//! - fitted model parameters (`PolyModel`) and the portable forecast file

pub mod types;

pub use types::*;
