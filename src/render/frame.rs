use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CandleDirection, GridPattern, LinePrimitive, RectPrimitive, TextPrimitive};

/// Wick plus body geometry for one candle, with its style tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleShape {
    pub direction: CandleDirection,
    /// Vertical high-to-low segment through the candle center.
    pub wick: LinePrimitive,
    /// Open-to-close rectangle.
    pub body: RectPrimitive,
}

impl CandleShape {
    pub fn validate(self) -> ChartResult<()> {
        self.wick.validate()?;
        self.body.validate()
    }
}

/// Backend-agnostic scene for one chart draw pass.
///
/// Stateless output of the geometry builder: discarded and rebuilt whenever
/// the series or the layout changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub grid: Option<GridPattern>,
    /// Horizontal price-quantile rules.
    pub rules: Vec<LinePrimitive>,
    /// Axis labels: prices on the left, times along the bottom.
    pub labels: Vec<TextPrimitive>,
    pub candles: Vec<CandleShape>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            grid: None,
            rules: Vec::new(),
            labels: Vec::new(),
            candles: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        if let Some(grid) = self.grid {
            grid.validate()?;
        }
        for rule in &self.rules {
            rule.validate()?;
        }
        for label in &self.labels {
            label.validate()?;
        }
        for candle in &self.candles {
            candle.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.is_none()
            && self.rules.is_empty()
            && self.labels.is_empty()
            && self.candles.is_empty()
    }
}
