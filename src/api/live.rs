use serde::{Deserialize, Serialize};

/// Token identifying one arming of the live ticker.
///
/// The engine hands this out from `start_live`; the external timer source
/// presents it back on every callback. After a symbol switch or an explicit
/// stop the old token no longer matches, so a stale callback can never
/// mutate a series it was not armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickerEpoch(u64);

impl TickerEpoch {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What the engine did with one timer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// The tail candle was updated (identity on an empty series).
    Applied,
    /// The cadence deadline has not been reached yet.
    NotDue,
    /// The presented epoch no longer matches the armed ticker.
    Stale,
}

/// Cadence state for the armed live ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiveTicker {
    pub(crate) epoch: TickerEpoch,
    interval_ms: i64,
    next_due_ms: i64,
}

impl LiveTicker {
    pub(crate) fn armed(epoch: TickerEpoch, interval_ms: i64, now_ms: i64) -> Self {
        Self {
            epoch,
            interval_ms,
            next_due_ms: now_ms.saturating_add(interval_ms),
        }
    }

    pub(crate) fn is_due(self, now_ms: i64) -> bool {
        now_ms >= self.next_due_ms
    }

    /// Schedules the next deadline relative to the observed callback time,
    /// so a slow host does not accumulate a backlog of catch-up ticks.
    pub(crate) fn reschedule(&mut self, now_ms: i64) {
        self.next_due_ms = now_ms.saturating_add(self.interval_ms);
    }
}
