use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One time bucket of simulated price action.
///
/// `timestamp_ms` is epoch milliseconds; prices are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Builds a validated candle from raw floating values.
    ///
    /// Invariants:
    /// - all prices are finite and >= 0
    /// - `high >= max(open, close)`
    /// - `low <= min(open, close)`
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        for (field, value) in [
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "candle `{field}` must be finite and >= 0"
                )));
            }
        }

        if high < open.max(close) {
            return Err(ChartError::InvalidData(
                "candle high must be >= max(open, close)".to_owned(),
            ));
        }
        if low > open.min(close) {
            return Err(ChartError::InvalidData(
                "candle low must be <= min(open, close)".to_owned(),
            ));
        }

        Ok(Self {
            timestamp_ms,
            open,
            high,
            low,
            close,
        })
    }

    /// Converts strongly-typed temporal/decimal feed input into a validated candle.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            time.timestamp_millis(),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }
}

fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}
