//! Data sources for the historical series.
//!
//! - `sample`: deterministic synthetic series (offline default)
//! - `remote`: published census CSV over HTTPS

pub mod remote;
pub mod sample;

pub use remote::*;
pub use sample::*;
