//! Tracing setup for hosts embedding `candlesim`.
//!
//! Nothing here runs implicitly: the engine only emits `tracing` events, and
//! a host either calls [`init_default_tracing`] once at startup or installs
//! its own subscriber and filters.

/// Installs a compact default `tracing` subscriber (feature `telemetry`).
///
/// The filter honors `RUST_LOG` and falls back to `candlesim=debug`.
/// Returns `false` when the feature is disabled or a global subscriber is
/// already installed, so calling this from library consumers is harmless.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("candlesim=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
