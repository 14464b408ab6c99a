//! candlesim: deterministic synthetic market data and chart geometry engine.
//!
//! This crate generates reproducible per-symbol OHLC candle series, evolves
//! the most recent candle on an externally driven tick cadence, and projects
//! the series into backend-agnostic render primitives sized to an arbitrary
//! viewport. It is purely presentational simulation and never touches real
//! trade or settlement data.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
