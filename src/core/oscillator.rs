//! Deterministic per-symbol noise source.
//!
//! The simulator needs values that look random on a chart but are fully
//! reproducible: the same symbol must always render the same history. A
//! smooth sine construction over `seed * index * phase` is enough for that;
//! the contract here is determinism and `[0, 1)` boundedness, not
//! statistical rigor.

/// Largest value the oscillator may return; keeps the interval half-open.
const UNIT_UPPER: f64 = 1.0 - f64::EPSILON;

/// Noise phases used by the series generator, one per OHLC channel, so the
/// channels are decorrelated but reproducible.
pub const PHASE_BODY: f64 = 0.1;
pub const PHASE_HIGH: f64 = 0.2;
pub const PHASE_LOW: f64 = 0.3;
pub const PHASE_DRIFT: f64 = 0.4;

/// Phase applied to the wall-clock variant driving live tail updates.
pub const PHASE_LIVE: f64 = 0.01;

/// Derives the stable per-symbol seed: wrapping sum of character codes.
///
/// Collisions across symbols are acceptable; two colliding symbols simply
/// render identical patterns.
#[must_use]
pub fn symbol_seed(symbol: &str) -> u32 {
    symbol
        .chars()
        .fold(0u32, |acc, ch| acc.wrapping_add(ch as u32))
}

/// Deterministic pseudo-random value in `[0, 1)` for `(seed, index, phase)`.
///
/// Pure and total: any combination of inputs, including zeros and non-finite
/// phases, yields a value inside the interval.
#[must_use]
pub fn oscillate(seed: u32, index: i64, phase: f64) -> f64 {
    unit_from_angle(f64::from(seed) * index as f64 * phase)
}

/// Wall-clock variant used by live tail updates: the angle advances with
/// `now_ms` (in seconds) instead of a candle index.
#[must_use]
pub fn oscillate_timed(seed: u32, now_ms: i64, phase: f64) -> f64 {
    let seconds = now_ms as f64 / 1000.0;
    unit_from_angle(f64::from(seed) * seconds * phase)
}

fn unit_from_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.5;
    }
    angle.sin().mul_add(0.5, 0.5).clamp(0.0, UNIT_UPPER)
}
