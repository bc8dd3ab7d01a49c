//! Shared types and the harvest forecasting engine for the Pitaya Bloom Tracker
//!
//! This crate contains the domain models, the location catalog and the pure
//! computations (yield ledger, forecasts, analytics, dashboard) shared between
//! the backend, the offline client (via WASM), and other components.

pub mod analytics;
pub mod catalog;
pub mod dashboard;
pub mod forecast;
pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use analytics::*;
pub use catalog::*;
pub use dashboard::*;
pub use forecast::*;
pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
