use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::candle::Candle;
use crate::core::oscillator::{
    PHASE_BODY, PHASE_DRIFT, PHASE_HIGH, PHASE_LIVE, PHASE_LOW, oscillate, oscillate_timed,
    symbol_seed,
};
use crate::error::{ChartError, ChartResult};

/// Tuning for the synthetic price walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationTuning {
    /// Per-candle noise amplitude used while building history.
    pub history_volatility: f64,
    /// Ceiling on a single live tick's close movement.
    pub tick_volatility: f64,
    /// Lower bound the walk never crosses; keeps all prices positive.
    pub price_floor: f64,
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self {
            history_volatility: 0.02,
            tick_volatility: 0.01,
            price_floor: 0.0001,
        }
    }
}

impl SimulationTuning {
    pub fn validate(self) -> ChartResult<()> {
        if !self.history_volatility.is_finite() || self.history_volatility <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "history volatility must be finite and > 0".to_owned(),
            ));
        }
        if !self.tick_volatility.is_finite() || self.tick_volatility <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "tick volatility must be finite and > 0".to_owned(),
            ));
        }
        if !self.price_floor.is_finite() || self.price_floor <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "price floor must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Ordered, fixed-interval OHLC sequence for one symbol, oldest first.
///
/// A series is replaced wholesale when the symbol changes; the only in-place
/// mutation is the tail update performed by [`CandleSeries::apply_tick`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    seed: u32,
    interval_ms: i64,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Builds the deterministic simulated history for `symbol`.
    ///
    /// The walk runs oldest candle first: each open is the previous stepped
    /// close, each close adds signed noise, and the high/low envelope is
    /// widened with non-negative noise, so the OHLC invariant holds by
    /// construction. The last candle lands exactly on `base_timestamp_ms`.
    ///
    /// `count == 0` yields an empty series.
    pub fn simulate(
        symbol: &str,
        count: usize,
        interval_ms: i64,
        base_timestamp_ms: i64,
        tuning: SimulationTuning,
    ) -> ChartResult<Self> {
        tuning.validate()?;
        if interval_ms <= 0 {
            return Err(ChartError::InvalidConfig(
                "candle interval must be > 0 ms".to_owned(),
            ));
        }

        let seed = symbol_seed(symbol);
        let volatility = tuning.history_volatility;
        let base_price = 1.0 + f64::from(seed % 50) / 100.0;

        let mut candles = Vec::with_capacity(count);
        let mut current = base_price;

        // Noise is keyed on candle age (count-1 .. 0) so a longer history
        // prepends older candles without changing the recent pattern.
        for age in (0..count).rev() {
            let timestamp_ms = base_timestamp_ms - (age as i64) * interval_ms;

            let body_noise = oscillate(seed, age as i64, PHASE_BODY);
            let high_noise = oscillate(seed, age as i64, PHASE_HIGH);
            let low_noise = oscillate(seed, age as i64, PHASE_LOW);
            let drift_noise = oscillate(seed, age as i64, PHASE_DRIFT);

            let open = current;
            let close =
                (open + (body_noise - 0.5) * volatility * 2.0).max(tuning.price_floor);
            let high = open.max(close) + high_noise * volatility;
            let low = (open.min(close) - low_noise * volatility).max(0.0);

            let candle = Candle::new(timestamp_ms, open, high, low, close).map_err(|err| {
                ChartError::Generation {
                    symbol: symbol.to_owned(),
                    reason: err.to_string(),
                }
            })?;
            candles.push(candle);

            current = (close + (drift_noise - 0.5) * volatility * 0.5).max(tuning.price_floor);
        }

        debug!(symbol, seed, count, "simulated candle series");
        Ok(Self {
            seed,
            interval_ms,
            candles,
        })
    }

    /// Wraps externally produced candles (the alternate-source seam).
    ///
    /// Timestamps must be strictly ascending; the interval between entries is
    /// not constrained so real feeds with gaps remain representable.
    pub fn from_candles(
        symbol: &str,
        interval_ms: i64,
        candles: Vec<Candle>,
    ) -> ChartResult<Self> {
        if interval_ms <= 0 {
            return Err(ChartError::InvalidConfig(
                "candle interval must be > 0 ms".to_owned(),
            ));
        }
        for pair in candles.windows(2) {
            if pair[1].timestamp_ms <= pair[0].timestamp_ms {
                return Err(ChartError::InvalidData(
                    "candle timestamps must be strictly ascending".to_owned(),
                ));
            }
        }

        Ok(Self {
            seed: symbol_seed(symbol),
            interval_ms,
            candles,
        })
    }

    /// Applies one live tick at `now_ms` to the most recent candle.
    ///
    /// Moves the close by a bounded signed delta and only ever widens the
    /// high/low envelope: a candle's extremes are monotonic over its own
    /// lifetime. All earlier candles are untouched. O(1); returns `Ok(false)`
    /// on an empty series.
    pub fn apply_tick(&mut self, now_ms: i64, tuning: SimulationTuning) -> ChartResult<bool> {
        tuning.validate()?;
        let Some(last) = self.candles.last_mut() else {
            return Ok(false);
        };

        let unit = oscillate_timed(self.seed, now_ms, PHASE_LIVE);
        let delta = (unit - 0.5) * tuning.tick_volatility;
        let close = (last.close + delta).max(tuning.price_floor);

        last.close = close;
        last.high = last.high.max(close);
        last.low = last.low.min(close);
        Ok(true)
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[must_use]
    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// Min/max across all candles' low/high; `None` for an empty series.
    #[must_use]
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for candle in &self.candles {
            min = min.min(candle.low);
            max = max.max(candle.high);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}
