use chrono::DateTime;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::candle::Candle;
use crate::core::{CandleSeries, PlotGeometry};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CandleDirection, CandleShape, GridPattern, LinePrimitive, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

/// Gap between the plot's left edge and right-aligned price labels.
const PRICE_LABEL_GAP_PX: f64 = 8.0;
/// Distance from the plot's bottom edge down to the time-label baseline.
const TIME_LABEL_OFFSET_PX: f64 = 25.0;

/// Tuning controls for scene assembly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTuning {
    /// Cells per axis in the background grid pattern.
    pub grid_divisions: u32,
    /// Horizontal rules (and price labels) at evenly spaced quantiles.
    pub price_rule_count: usize,
    /// A time label is emitted for every n-th candle.
    pub time_label_stride: usize,
    /// Doji candles still get a visible body of this height.
    pub min_body_height_px: f64,
    pub wick_stroke_px: f64,
    pub rule_stroke_px: f64,
    pub price_decimals: usize,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            grid_divisions: 5,
            price_rule_count: 5,
            time_label_stride: 5,
            min_body_height_px: 1.0,
            wick_stroke_px: 1.5,
            rule_stroke_px: 1.0,
            price_decimals: 4,
        }
    }
}

impl SceneTuning {
    pub fn validate(self) -> ChartResult<()> {
        if self.grid_divisions == 0 {
            return Err(ChartError::InvalidConfig(
                "grid divisions must be >= 1".to_owned(),
            ));
        }
        if self.price_rule_count < 2 {
            return Err(ChartError::InvalidConfig(
                "price rule count must be >= 2".to_owned(),
            ));
        }
        if self.time_label_stride == 0 {
            return Err(ChartError::InvalidConfig(
                "time label stride must be >= 1".to_owned(),
            ));
        }
        for (name, value) in [
            ("min body height", self.min_body_height_px),
            ("wick stroke", self.wick_stroke_px),
            ("rule stroke", self.rule_stroke_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Builds the full primitive set for one draw pass.
///
/// Purely a function of series + layout; safe to call on every animation
/// frame, though the engine only rebuilds when its inputs change.
pub fn build_frame(
    series: &CandleSeries,
    geometry: &PlotGeometry,
    tuning: SceneTuning,
) -> ChartResult<RenderFrame> {
    tuning.validate()?;
    if series.len() != geometry.candle_count() {
        return Err(ChartError::InvalidData(
            "layout was computed for a different series length".to_owned(),
        ));
    }

    let mut frame = RenderFrame::new(geometry.viewport());

    let divisions = f64::from(tuning.grid_divisions);
    frame.grid = Some(GridPattern::new(
        geometry.insets().left,
        geometry.insets().top,
        geometry.inner_width() / divisions,
        geometry.inner_height() / divisions,
    ));

    build_price_rules(geometry, tuning, &mut frame);
    build_time_labels(series, geometry, tuning, &mut frame)?;
    frame.candles = project_candle_shapes(series, geometry, tuning);

    Ok(frame)
}

/// Horizontal rules and right-aligned price labels at evenly spaced
/// quantiles of the price range (top of plot = 100%).
fn build_price_rules(geometry: &PlotGeometry, tuning: SceneTuning, frame: &mut RenderFrame) {
    let denominator = (tuning.price_rule_count - 1) as f64;
    let ratios: SmallVec<[f64; 8]> = (0..tuning.price_rule_count)
        .map(|step| step as f64 / denominator)
        .collect();

    let left = geometry.insets().left;
    let right = left + geometry.inner_width();

    for ratio in ratios {
        let y = geometry.y_at_ratio(ratio);
        frame
            .rules
            .push(LinePrimitive::new(left, y, right, y, tuning.rule_stroke_px));
        frame.labels.push(TextPrimitive::new(
            format!(
                "{price:.precision$}",
                price = geometry.price_at_ratio(ratio),
                precision = tuning.price_decimals
            ),
            left - PRICE_LABEL_GAP_PX,
            y,
            TextHAlign::Right,
        ));
    }
}

/// Centered time labels under every `time_label_stride`-th candle.
fn build_time_labels(
    series: &CandleSeries,
    geometry: &PlotGeometry,
    tuning: SceneTuning,
    frame: &mut RenderFrame,
) -> ChartResult<()> {
    let baseline = geometry.insets().top + geometry.inner_height() + TIME_LABEL_OFFSET_PX;

    for (index, candle) in series.candles().iter().enumerate() {
        if index % tuning.time_label_stride != 0 {
            continue;
        }
        frame.labels.push(TextPrimitive::new(
            format_time_label(candle.timestamp_ms)?,
            geometry.candle_center_x(index),
            baseline,
            TextHAlign::Center,
        ));
    }
    Ok(())
}

/// Short month-day label, e.g. "Jan 5".
fn format_time_label(timestamp_ms: i64) -> ChartResult<String> {
    let datetime = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        ChartError::InvalidData(format!(
            "timestamp {timestamp_ms} ms is outside the representable range"
        ))
    })?;
    Ok(datetime.format("%b %-d").to_string())
}

fn project_candle_shapes(
    series: &CandleSeries,
    geometry: &PlotGeometry,
    tuning: SceneTuning,
) -> Vec<CandleShape> {
    #[cfg(feature = "parallel-projection")]
    {
        series
            .candles()
            .par_iter()
            .enumerate()
            .map(|(index, candle)| project_candle(*candle, index, geometry, tuning))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        series
            .candles()
            .iter()
            .enumerate()
            .map(|(index, candle)| project_candle(*candle, index, geometry, tuning))
            .collect()
    }
}

fn project_candle(
    candle: Candle,
    index: usize,
    geometry: &PlotGeometry,
    tuning: SceneTuning,
) -> CandleShape {
    let center_x = geometry.candle_center_x(index);

    let open_y = geometry.price_to_y(candle.open);
    let close_y = geometry.price_to_y(candle.close);
    let high_y = geometry.price_to_y(candle.high);
    let low_y = geometry.price_to_y(candle.low);

    let body_top = open_y.min(close_y);
    let body_height = (close_y - open_y).abs().max(tuning.min_body_height_px);

    let direction = if candle.is_bullish() {
        CandleDirection::Bullish
    } else {
        CandleDirection::Bearish
    };

    CandleShape {
        direction,
        wick: LinePrimitive::new(center_x, high_y, center_x, low_y, tuning.wick_stroke_px),
        body: RectPrimitive::new(
            center_x - geometry.body_width() / 2.0,
            body_top,
            geometry.body_width(),
            body_height,
        ),
    }
}
