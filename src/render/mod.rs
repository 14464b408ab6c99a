mod frame;
mod null_renderer;
mod primitives;
pub mod scene;

pub use frame::{CandleShape, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CandleDirection, GridPattern, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use scene::{SceneTuning, build_frame};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame`; the
/// core never assumes a specific drawing API.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
