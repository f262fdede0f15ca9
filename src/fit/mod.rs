//! Forecasting components.
//!
//! Two independent, stateless forecasters over the same input series:
//!
//! - `trend`: autoregressive linear trend on engineered lag features
//! - `poly`: polynomial curve fit over normalized years
//!
//! Neither shares state with the other; both copy their input and may be
//! called concurrently.

pub mod poly;
pub mod trend;

pub use poly::*;
pub use trend::*;
