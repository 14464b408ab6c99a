mod engine;
mod engine_config;
mod live;

pub use engine::{ChartEngine, ChartPhase};
pub use engine_config::ChartEngineConfig;
pub use live::{TickOutcome, TickerEpoch};
