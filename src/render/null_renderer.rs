use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_rule_count: usize,
    pub last_label_count: usize,
    pub last_candle_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_rule_count = frame.rules.len();
        self.last_label_count = frame.labels.len();
        self.last_candle_count = frame.candles.len();
        Ok(())
    }
}
