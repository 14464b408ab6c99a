use candlesim::core::{Candle, CandleSeries, SimulationTuning};

const HOUR_MS: i64 = 3_600_000;
const BASE_TS: i64 = 1_700_000_000_000;

fn simulate(symbol: &str, count: usize) -> CandleSeries {
    CandleSeries::simulate(symbol, count, HOUR_MS, BASE_TS, SimulationTuning::default())
        .expect("simulate")
}

#[test]
fn same_inputs_yield_identical_series() {
    let first = simulate("EUR/USD", 30);
    let second = simulate("EUR/USD", 30);
    assert_eq!(first, second);
}

#[test]
fn ohlc_envelope_holds_for_every_candle() {
    for symbol in ["EUR/USD", "GBP/JPY", "BTC/USDT", "X", ""] {
        let series = simulate(symbol, 120);
        for candle in series.candles() {
            assert!(
                candle.high >= candle.open.max(candle.close),
                "high violated for {symbol}: {candle:?}"
            );
            assert!(
                candle.low <= candle.open.min(candle.close),
                "low violated for {symbol}: {candle:?}"
            );
            assert!(candle.low >= 0.0);
            assert!(candle.high.is_finite());
        }
    }
}

#[test]
fn timestamps_form_a_fixed_lattice_ending_at_base() {
    let series = simulate("EUR/USD", 30);
    let candles = series.candles();
    assert_eq!(candles.len(), 30);

    for pair in candles.windows(2) {
        assert_eq!(pair[1].timestamp_ms - pair[0].timestamp_ms, HOUR_MS);
    }
    assert_eq!(candles[0].timestamp_ms, BASE_TS - 29 * HOUR_MS);
    assert_eq!(candles[29].timestamp_ms, BASE_TS);
}

#[test]
fn eur_usd_thirty_candle_scenario() {
    let series = simulate("EUR/USD", 30);
    assert_eq!(series.len(), 30);

    for candle in series.candles() {
        for price in [candle.open, candle.high, candle.low, candle.close] {
            assert!(
                (0.5..2.5).contains(&price),
                "price {price} outside plausible band"
            );
        }
        assert!(candle.high >= candle.open.max(candle.close));
        assert!(candle.low <= candle.open.min(candle.close));
    }
}

#[test]
fn base_price_sits_in_the_quote_band() {
    for symbol in ["EUR/USD", "GBP/JPY", "AUD/CAD"] {
        let series = simulate(symbol, 10);
        let oldest_open = series.candles()[0].open;
        assert!(
            (1.0..1.5).contains(&oldest_open),
            "base price {oldest_open} for {symbol}"
        );
    }
}

#[test]
fn chained_opens_follow_the_walk() {
    // Each candle opens where the previous stepped close left the walk;
    // opens therefore never jump outside the per-candle drift bound.
    let tuning = SimulationTuning::default();
    let series = simulate("EUR/USD", 60);
    for pair in series.candles().windows(2) {
        let max_step = tuning.history_volatility * 0.25;
        assert!(
            (pair[1].open - pair[0].close).abs() <= max_step + 1e-12,
            "open drifted too far from previous close"
        );
    }
}

#[test]
fn zero_count_yields_empty_series() {
    let series = simulate("EUR/USD", 0);
    assert!(series.is_empty());
    assert_eq!(series.price_bounds(), None);
}

#[test]
fn invalid_tuning_is_rejected() {
    let bad = SimulationTuning {
        history_volatility: -0.5,
        ..SimulationTuning::default()
    };
    assert!(CandleSeries::simulate("EUR/USD", 10, HOUR_MS, BASE_TS, bad).is_err());

    assert!(
        CandleSeries::simulate("EUR/USD", 10, 0, BASE_TS, SimulationTuning::default()).is_err()
    );
}

#[test]
fn external_candles_must_be_strictly_ascending() {
    let flat = |ts: i64| Candle::new(ts, 1.0, 1.0, 1.0, 1.0).expect("candle");

    let ordered = vec![flat(0), flat(HOUR_MS), flat(2 * HOUR_MS)];
    assert!(CandleSeries::from_candles("EUR/USD", HOUR_MS, ordered).is_ok());

    let duplicated = vec![flat(0), flat(0)];
    assert!(CandleSeries::from_candles("EUR/USD", HOUR_MS, duplicated).is_err());

    let reversed = vec![flat(HOUR_MS), flat(0)];
    assert!(CandleSeries::from_candles("EUR/USD", HOUR_MS, reversed).is_err());
}

#[test]
fn price_bounds_cover_the_envelope() {
    let series = simulate("GBP/JPY", 40);
    let (min, max) = series.price_bounds().expect("bounds");
    for candle in series.candles() {
        assert!(candle.low >= min);
        assert!(candle.high <= max);
    }
}
