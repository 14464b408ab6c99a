pub mod candle;
pub mod geometry;
pub mod oscillator;
pub mod series;
pub mod types;

pub use candle::Candle;
pub use geometry::{LayoutTuning, PlotGeometry};
pub use series::{CandleSeries, SimulationTuning};
pub use types::{Insets, Viewport};
