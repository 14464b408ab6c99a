use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{Candle, CandleSeries, PlotGeometry, Viewport};
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer, scene};

use super::engine_config::ChartEngineConfig;
use super::live::{LiveTicker, TickOutcome, TickerEpoch};

/// What the engine can currently produce for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartPhase {
    /// Container width is unknown or zero; output is deferred.
    AwaitingMeasure,
    /// No drawable series (generation failed or the series is empty).
    Unavailable,
    /// A frame can be produced.
    Ready,
}

/// Orchestration facade consumed by host applications.
///
/// Owns one symbol's series, the cached layout, and the live-tick resource.
/// The host feeds it the two external signals (periodic tick timestamps and
/// container-width measurements) and pulls frames out.
pub struct ChartEngine<R: Renderer> {
    renderer: R,
    config: ChartEngineConfig,
    symbol: String,
    series: Option<CandleSeries>,
    container_width_px: u32,
    geometry: Option<PlotGeometry>,
    ticker: Option<LiveTicker>,
    epoch_counter: u64,
}

impl<R: Renderer> ChartEngine<R> {
    /// Builds the engine and the initial series for `symbol`.
    ///
    /// `now_ms` anchors the last historical candle. The container starts
    /// unmeasured; the host pushes a width before frames are produced.
    pub fn new(
        renderer: R,
        config: ChartEngineConfig,
        symbol: impl Into<String>,
        now_ms: i64,
    ) -> ChartResult<Self> {
        config.validate()?;
        let symbol = symbol.into();
        let series = CandleSeries::simulate(
            &symbol,
            config.candle_count,
            config.interval_ms,
            now_ms,
            config.simulation,
        )?;

        Ok(Self {
            renderer,
            config,
            symbol,
            series: Some(series),
            container_width_px: 0,
            geometry: None,
            ticker: None,
            epoch_counter: 0,
        })
    }

    /// Switches instrument: cancels any armed ticker, rebuilds the series,
    /// and re-arms with a fresh epoch if live updates were running.
    ///
    /// The ticker is released before generation starts, so the failure path
    /// cannot leak a timer that would mutate the wrong symbol's data. On
    /// failure the engine reports [`ChartPhase::Unavailable`] until the next
    /// successful switch.
    pub fn set_symbol(&mut self, symbol: impl Into<String>, now_ms: i64) -> ChartResult<()> {
        let resume_live = self.ticker.take().is_some();
        self.series = None;
        self.geometry = None;
        self.symbol = symbol.into();

        match CandleSeries::simulate(
            &self.symbol,
            self.config.candle_count,
            self.config.interval_ms,
            now_ms,
            self.config.simulation,
        ) {
            Ok(series) => {
                self.series = Some(series);
                self.refresh_geometry();
                if resume_live {
                    let epoch = self.start_live(now_ms);
                    debug!(symbol = %self.symbol, epoch = epoch.raw(), "live updates re-armed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(symbol = %self.symbol, error = %err, "series generation failed");
                Err(err)
            }
        }
    }

    /// Replaces the simulated series with externally produced candles.
    ///
    /// Stops live updates: synthetic drift on supplied data would fabricate
    /// prices the feed never delivered.
    pub fn set_candles(&mut self, candles: Vec<Candle>) -> ChartResult<()> {
        let series = CandleSeries::from_candles(&self.symbol, self.config.interval_ms, candles)?;
        self.ticker = None;
        self.series = Some(series);
        self.refresh_geometry();
        Ok(())
    }

    /// Accepts a container-width measurement (`0` = not yet measured).
    ///
    /// Layout is recomputed only when the width actually changes; live ticks
    /// alone do not re-run the scaler.
    pub fn set_container_width(&mut self, width_px: u32) {
        if width_px == self.container_width_px {
            return;
        }
        self.container_width_px = width_px;

        if width_px == 0 {
            debug!(symbol = %self.symbol, "awaiting container measurement");
            self.geometry = None;
            return;
        }
        self.refresh_geometry();
    }

    /// Arms the live ticker and returns the epoch the external timer must
    /// present on each callback. Re-arming invalidates the previous epoch.
    pub fn start_live(&mut self, now_ms: i64) -> TickerEpoch {
        self.epoch_counter += 1;
        let epoch = TickerEpoch::new(self.epoch_counter);
        self.ticker = Some(LiveTicker::armed(epoch, self.config.tick_interval_ms, now_ms));
        epoch
    }

    /// Releases the live ticker; matching teardown for [`Self::start_live`].
    ///
    /// Returns `false` when nothing was armed (idempotent).
    pub fn stop_live(&mut self) -> bool {
        self.ticker.take().is_some()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.ticker.is_some()
    }

    /// Epoch of the currently armed ticker, if any.
    #[must_use]
    pub fn live_epoch(&self) -> Option<TickerEpoch> {
        self.ticker.map(|ticker| ticker.epoch)
    }

    /// One callback from the external timer source.
    ///
    /// Rejects epochs from before a symbol switch or stop, defers callbacks
    /// ahead of the cadence deadline, and otherwise applies a tail update.
    /// Layout is refreshed only when the tick pushes the tail candle outside
    /// the cached price domain.
    pub fn on_tick(&mut self, epoch: TickerEpoch, now_ms: i64) -> ChartResult<TickOutcome> {
        let Some(ticker) = self.ticker.as_mut() else {
            return Ok(TickOutcome::Stale);
        };
        if ticker.epoch != epoch {
            warn!(
                symbol = %self.symbol,
                presented = epoch.raw(),
                armed = ticker.epoch.raw(),
                "stale tick rejected"
            );
            return Ok(TickOutcome::Stale);
        }
        if !ticker.is_due(now_ms) {
            return Ok(TickOutcome::NotDue);
        }
        ticker.reschedule(now_ms);

        if let Some(series) = self.series.as_mut() {
            series.apply_tick(now_ms, self.config.simulation)?;

            let escaped = match (series.last(), self.geometry) {
                (Some(last), Some(geometry)) => {
                    !geometry.covers_price(last.high) || !geometry.covers_price(last.low)
                }
                _ => false,
            };
            if escaped {
                debug!(symbol = %self.symbol, "tick escaped cached price domain");
                self.refresh_geometry();
            }
        }

        Ok(TickOutcome::Applied)
    }

    /// Current readiness of the output path.
    #[must_use]
    pub fn phase(&self) -> ChartPhase {
        if self.container_width_px == 0 {
            return ChartPhase::AwaitingMeasure;
        }
        match (&self.series, &self.geometry) {
            (Some(series), Some(_)) if !series.is_empty() => ChartPhase::Ready,
            _ => ChartPhase::Unavailable,
        }
    }

    /// Builds the primitive set for the current state.
    ///
    /// Returns `Ok(None)` while preconditions are unmet (unmeasured
    /// container, unavailable series) instead of erroring.
    pub fn build_frame(&self) -> ChartResult<Option<RenderFrame>> {
        let (Some(series), Some(geometry)) = (&self.series, &self.geometry) else {
            return Ok(None);
        };
        scene::build_frame(series, geometry, self.config.scene).map(Some)
    }

    /// Builds and hands the frame to the renderer.
    ///
    /// Returns `false` when output is deferred.
    pub fn render(&mut self) -> ChartResult<bool> {
        let Some(frame) = self.build_frame()? else {
            return Ok(false);
        };
        self.renderer.render(&frame)?;
        Ok(true)
    }

    /// Serializes the engine's observable state to pretty JSON for
    /// diagnostics and golden tests.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        let snapshot = EngineSnapshot {
            symbol: &self.symbol,
            phase: self.phase(),
            live: self.is_live(),
            series: self.series.as_ref(),
            frame: self.build_frame()?,
        };
        serde_json::to_string_pretty(&snapshot).map_err(|e| {
            crate::error::ChartError::InvalidData(format!("failed to serialize snapshot: {e}"))
        })
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn series(&self) -> Option<&CandleSeries> {
        self.series.as_ref()
    }

    #[must_use]
    pub fn geometry(&self) -> Option<&PlotGeometry> {
        self.geometry.as_ref()
    }

    #[must_use]
    pub fn container_width(&self) -> u32 {
        self.container_width_px
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.container_width_px, self.config.chart_height_px)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn refresh_geometry(&mut self) {
        self.geometry = None;
        let Some(series) = &self.series else {
            return;
        };
        if series.is_empty() || self.container_width_px == 0 {
            return;
        }

        let viewport = Viewport::new(self.container_width_px, self.config.chart_height_px);
        match PlotGeometry::compute(series, viewport, self.config.insets, self.config.layout) {
            Ok(geometry) => self.geometry = Some(geometry),
            Err(err) => warn!(symbol = %self.symbol, error = %err, "viewport layout failed"),
        }
    }
}

#[derive(Serialize)]
struct EngineSnapshot<'a> {
    symbol: &'a str,
    phase: ChartPhase,
    live: bool,
    series: Option<&'a CandleSeries>,
    frame: Option<RenderFrame>,
}
