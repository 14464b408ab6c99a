use serde::{Deserialize, Serialize};

use crate::core::{Insets, LayoutTuning, SimulationTuning};
use crate::error::{ChartError, ChartResult};
use crate::render::SceneTuning;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    /// Historical candles kept per series; `0` yields an empty series.
    #[serde(default = "default_candle_count")]
    pub candle_count: usize,
    /// Time bucket per candle, milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: i64,
    /// Fixed chart height; only the width is externally driven.
    #[serde(default = "default_chart_height_px")]
    pub chart_height_px: u32,
    #[serde(default)]
    pub insets: Insets,
    #[serde(default)]
    pub simulation: SimulationTuning,
    #[serde(default)]
    pub layout: LayoutTuning,
    #[serde(default)]
    pub scene: SceneTuning,
    /// Cadence of the external live-tick source, milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: i64,
}

impl Default for ChartEngineConfig {
    fn default() -> Self {
        Self {
            candle_count: default_candle_count(),
            interval_ms: default_interval_ms(),
            chart_height_px: default_chart_height_px(),
            insets: Insets::default(),
            simulation: SimulationTuning::default(),
            layout: LayoutTuning::default(),
            scene: SceneTuning::default(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl ChartEngineConfig {
    /// Sets the historical candle count.
    #[must_use]
    pub fn with_candle_count(mut self, candle_count: usize) -> Self {
        self.candle_count = candle_count;
        self
    }

    /// Sets the candle interval in milliseconds.
    #[must_use]
    pub fn with_interval_ms(mut self, interval_ms: i64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Sets the fixed chart height in pixels.
    #[must_use]
    pub fn with_chart_height_px(mut self, chart_height_px: u32) -> Self {
        self.chart_height_px = chart_height_px;
        self
    }

    /// Sets the plot padding insets.
    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Sets the synthetic-walk tuning.
    #[must_use]
    pub fn with_simulation(mut self, simulation: SimulationTuning) -> Self {
        self.simulation = simulation;
        self
    }

    /// Sets the viewport layout tuning.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutTuning) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the scene assembly tuning.
    #[must_use]
    pub fn with_scene(mut self, scene: SceneTuning) -> Self {
        self.scene = scene;
        self
    }

    /// Sets the live tick cadence in milliseconds.
    #[must_use]
    pub fn with_tick_interval_ms(mut self, tick_interval_ms: i64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if self.interval_ms <= 0 {
            return Err(ChartError::InvalidConfig(
                "candle interval must be > 0 ms".to_owned(),
            ));
        }
        if self.chart_height_px == 0 {
            return Err(ChartError::InvalidConfig(
                "chart height must be > 0 px".to_owned(),
            ));
        }
        if self.tick_interval_ms <= 0 {
            return Err(ChartError::InvalidConfig(
                "tick interval must be > 0 ms".to_owned(),
            ));
        }
        self.insets.validate()?;
        self.simulation.validate()?;
        self.layout.validate()?;
        self.scene.validate()
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_candle_count() -> usize {
    30
}

fn default_interval_ms() -> i64 {
    3_600_000
}

fn default_chart_height_px() -> u32 {
    400
}

fn default_tick_interval_ms() -> i64 {
    3_000
}
