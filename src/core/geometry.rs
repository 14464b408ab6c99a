use serde::{Deserialize, Serialize};

use crate::core::series::CandleSeries;
use crate::core::types::{Insets, Viewport};
use crate::error::{ChartError, ChartResult};

/// Tuning controls for viewport layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutTuning {
    /// Floor on the price span, so a flat series never divides by zero.
    pub min_price_span: f64,
    pub body_width_min_px: f64,
    pub body_width_max_px: f64,
    /// Horizontal gap reserved between neighboring candle bodies.
    pub body_gutter_px: f64,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            min_price_span: 0.0001,
            body_width_min_px: 2.0,
            body_width_max_px: 12.0,
            body_gutter_px: 2.0,
        }
    }
}

impl LayoutTuning {
    pub fn validate(self) -> ChartResult<()> {
        if !self.min_price_span.is_finite() || self.min_price_span <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "min price span must be finite and > 0".to_owned(),
            ));
        }
        if !self.body_width_min_px.is_finite()
            || !self.body_width_max_px.is_finite()
            || self.body_width_min_px <= 0.0
            || self.body_width_max_px < self.body_width_min_px
        {
            return Err(ChartError::InvalidConfig(
                "body width bounds must be finite, > 0 and ordered".to_owned(),
            ));
        }
        if !self.body_gutter_px.is_finite() || self.body_gutter_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "body gutter must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Derived pixel-space layout for one series in one viewport.
///
/// Ephemeral by design: recomputed whenever the series identity or the
/// container width changes, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    viewport: Viewport,
    insets: Insets,
    inner_width: f64,
    inner_height: f64,
    min_price: f64,
    max_price: f64,
    price_range: f64,
    price_scale: f64,
    candle_count: usize,
    candle_spacing: f64,
    body_width: f64,
}

impl PlotGeometry {
    /// Lays out `series` inside `viewport`.
    ///
    /// Pure function of its inputs. An unmeasured viewport (zero width or
    /// height) and an empty series are signaled preconditions, not internal
    /// failures: the caller defers rendering until both clear.
    pub fn compute(
        series: &CandleSeries,
        viewport: Viewport,
        insets: Insets,
        tuning: LayoutTuning,
    ) -> ChartResult<Self> {
        tuning.validate()?;
        insets.validate()?;
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let Some((min_price, max_price)) = series.price_bounds() else {
            return Err(ChartError::InvalidData(
                "layout requires a non-empty series".to_owned(),
            ));
        };

        let inner_width = (f64::from(viewport.width) - insets.left - insets.right).max(1.0);
        let inner_height = (f64::from(viewport.height) - insets.top - insets.bottom).max(1.0);

        let price_range = (max_price - min_price).max(tuning.min_price_span);
        let price_scale = inner_height / price_range;

        let candle_count = series.len();
        let candle_spacing = inner_width / candle_count as f64;
        let body_width = (candle_spacing - tuning.body_gutter_px)
            .clamp(tuning.body_width_min_px, tuning.body_width_max_px);

        Ok(Self {
            viewport,
            insets,
            inner_width,
            inner_height,
            min_price,
            max_price,
            price_range,
            price_scale,
            candle_count,
            candle_spacing,
            body_width,
        })
    }

    /// Maps a price to pixel Y with vertical flip: higher price, smaller Y.
    #[must_use]
    pub fn price_to_y(self, price: f64) -> f64 {
        self.insets.top + self.inner_height - (price - self.min_price) * self.price_scale
    }

    /// Horizontal center of the candle at `index` (0 = oldest).
    #[must_use]
    pub fn candle_center_x(self, index: usize) -> f64 {
        self.insets.left + index as f64 * self.candle_spacing + self.candle_spacing / 2.0
    }

    /// Price at a vertical ratio of the plot: 0.0 = top edge, 1.0 = bottom.
    #[must_use]
    pub fn price_at_ratio(self, ratio: f64) -> f64 {
        self.min_price + self.price_range * (1.0 - ratio)
    }

    /// Pixel Y at a vertical ratio of the plot.
    #[must_use]
    pub fn y_at_ratio(self, ratio: f64) -> f64 {
        self.insets.top + self.inner_height * ratio
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn insets(self) -> Insets {
        self.insets
    }

    #[must_use]
    pub fn inner_width(self) -> f64 {
        self.inner_width
    }

    #[must_use]
    pub fn inner_height(self) -> f64 {
        self.inner_height
    }

    #[must_use]
    pub fn price_bounds(self) -> (f64, f64) {
        (self.min_price, self.max_price)
    }

    #[must_use]
    pub fn price_range(self) -> f64 {
        self.price_range
    }

    #[must_use]
    pub fn price_scale(self) -> f64 {
        self.price_scale
    }

    #[must_use]
    pub fn candle_count(self) -> usize {
        self.candle_count
    }

    #[must_use]
    pub fn candle_spacing(self) -> f64 {
        self.candle_spacing
    }

    #[must_use]
    pub fn body_width(self) -> f64 {
        self.body_width
    }

    /// Whether `price` falls inside the laid-out domain.
    ///
    /// Live ticks may widen the series envelope past the cached layout; the
    /// engine uses this to decide when a recompute is due.
    #[must_use]
    pub fn covers_price(self, price: f64) -> bool {
        price >= self.min_price && price <= self.max_price
    }
}
