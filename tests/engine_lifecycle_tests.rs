use candlesim::api::{ChartEngine, ChartEngineConfig, ChartPhase, TickOutcome};
use candlesim::core::Candle;
use candlesim::render::NullRenderer;

const BASE_TS: i64 = 1_700_000_000_000;
const TICK_MS: i64 = 3_000;

fn engine() -> ChartEngine<NullRenderer> {
    ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::default(),
        "EUR/USD",
        BASE_TS,
    )
    .expect("engine init")
}

#[test]
fn engine_starts_unmeasured() {
    let engine = engine();
    assert_eq!(engine.phase(), ChartPhase::AwaitingMeasure);
    assert_eq!(engine.container_width(), 0);
    assert!(engine.build_frame().expect("frame").is_none());
}

#[test]
fn measurement_gates_rendering() {
    let mut engine = engine();
    assert!(!engine.render().expect("render"));

    engine.set_container_width(800);
    assert_eq!(engine.phase(), ChartPhase::Ready);
    assert!(engine.render().expect("render"));
    assert_eq!(engine.renderer().last_candle_count, 30);
    assert_eq!(engine.renderer().last_rule_count, 5);

    engine.set_container_width(0);
    assert_eq!(engine.phase(), ChartPhase::AwaitingMeasure);
    assert!(!engine.render().expect("render"));
}

#[test]
fn resize_rescales_the_cached_layout() {
    let mut engine = engine();
    engine.set_container_width(800);
    let wide_spacing = engine.geometry().expect("geometry").candle_spacing();

    engine.set_container_width(400);
    let narrow_spacing = engine.geometry().expect("geometry").candle_spacing();

    let wide_inner = 800.0 - 60.0 - 20.0;
    let narrow_inner = 400.0 - 60.0 - 20.0;
    assert!((wide_spacing - wide_inner / 30.0).abs() < 1e-9);
    assert!((narrow_spacing - narrow_inner / 30.0).abs() < 1e-9);
}

#[test]
fn symbol_switch_replaces_the_series() {
    let mut engine = engine();
    engine.set_container_width(800);
    let before = engine.series().expect("series").clone();

    engine.set_symbol("GBP/JPY", BASE_TS).expect("switch");
    let after = engine.series().expect("series");
    assert_eq!(engine.symbol(), "GBP/JPY");
    assert_ne!(&before, after);
    assert_eq!(engine.phase(), ChartPhase::Ready);
}

#[test]
fn live_ticks_apply_on_the_cadence() {
    let mut engine = engine();
    engine.set_container_width(800);
    let epoch = engine.start_live(BASE_TS);

    assert_eq!(
        engine.on_tick(epoch, BASE_TS + 1).expect("tick"),
        TickOutcome::NotDue
    );
    assert_eq!(
        engine.on_tick(epoch, BASE_TS + TICK_MS).expect("tick"),
        TickOutcome::Applied
    );
    // The deadline advances relative to the applied tick.
    assert_eq!(
        engine.on_tick(epoch, BASE_TS + TICK_MS + 1).expect("tick"),
        TickOutcome::NotDue
    );
    assert_eq!(
        engine
            .on_tick(epoch, BASE_TS + 2 * TICK_MS)
            .expect("tick"),
        TickOutcome::Applied
    );
}

#[test]
fn ticks_only_touch_the_tail() {
    let mut engine = engine();
    engine.set_container_width(800);
    let before = engine.series().expect("series").clone();

    let epoch = engine.start_live(BASE_TS);
    engine
        .on_tick(epoch, BASE_TS + TICK_MS)
        .expect("tick");

    let after = engine.series().expect("series");
    assert_eq!(&before.candles()[..29], &after.candles()[..29]);
}

#[test]
fn symbol_switch_invalidates_old_epochs() {
    let mut engine = engine();
    engine.set_container_width(800);

    let old_epoch = engine.start_live(BASE_TS);
    engine.set_symbol("GBP/JPY", BASE_TS).expect("switch");

    // Live updates were re-armed for the new symbol under a fresh epoch.
    assert!(engine.is_live());
    let new_epoch = engine.live_epoch().expect("epoch");
    assert_ne!(old_epoch, new_epoch);

    assert_eq!(
        engine
            .on_tick(old_epoch, BASE_TS + TICK_MS)
            .expect("tick"),
        TickOutcome::Stale
    );
    assert_eq!(
        engine
            .on_tick(new_epoch, BASE_TS + TICK_MS)
            .expect("tick"),
        TickOutcome::Applied
    );
}

#[test]
fn stop_live_is_idempotent_teardown() {
    let mut engine = engine();
    let epoch = engine.start_live(BASE_TS);

    assert!(engine.stop_live());
    assert!(!engine.stop_live());
    assert!(!engine.is_live());
    assert_eq!(
        engine.on_tick(epoch, BASE_TS + TICK_MS).expect("tick"),
        TickOutcome::Stale
    );
}

#[test]
fn symbol_switch_without_live_stays_idle() {
    let mut engine = engine();
    engine.set_symbol("GBP/JPY", BASE_TS).expect("switch");
    assert!(!engine.is_live());
    assert_eq!(engine.live_epoch(), None);
}

#[test]
fn external_candles_replace_simulation_and_stop_live() {
    let mut engine = engine();
    engine.set_container_width(800);
    let epoch = engine.start_live(BASE_TS);

    let candles: Vec<Candle> = (0..10)
        .map(|index| {
            let price = 100.0 + index as f64;
            Candle::new(
                BASE_TS + index * 60_000,
                price,
                price + 0.5,
                price - 0.5,
                price + 0.25,
            )
            .expect("candle")
        })
        .collect();
    engine.set_candles(candles).expect("set candles");

    assert!(!engine.is_live());
    assert_eq!(engine.series().expect("series").len(), 10);
    assert_eq!(
        engine.on_tick(epoch, BASE_TS + TICK_MS).expect("tick"),
        TickOutcome::Stale
    );
}

#[test]
fn rejected_external_candles_keep_the_previous_series() {
    let mut engine = engine();
    engine.set_container_width(800);
    let before = engine.series().expect("series").clone();

    let unordered = vec![
        Candle::new(BASE_TS, 1.0, 1.1, 0.9, 1.0).expect("candle"),
        Candle::new(BASE_TS, 1.0, 1.1, 0.9, 1.0).expect("candle"),
    ];
    assert!(engine.set_candles(unordered).is_err());
    assert_eq!(engine.series().expect("series"), &before);
    assert_eq!(engine.phase(), ChartPhase::Ready);
}

#[test]
fn zero_candle_config_reports_unavailable() {
    let config = ChartEngineConfig::default().with_candle_count(0);
    let mut engine =
        ChartEngine::new(NullRenderer::default(), config, "EUR/USD", BASE_TS).expect("engine");

    engine.set_container_width(800);
    assert_eq!(engine.phase(), ChartPhase::Unavailable);
    assert!(engine.build_frame().expect("frame").is_none());
}

#[test]
fn config_round_trips_through_json() {
    let config = ChartEngineConfig::default()
        .with_candle_count(64)
        .with_interval_ms(60_000)
        .with_tick_interval_ms(1_000);

    let json = config.to_json_pretty().expect("serialize");
    let parsed = ChartEngineConfig::from_json_str(&json).expect("parse");
    assert_eq!(config, parsed);
}

#[test]
fn invalid_config_is_rejected_at_init() {
    let config = ChartEngineConfig::default().with_interval_ms(0);
    assert!(ChartEngine::new(NullRenderer::default(), config, "EUR/USD", BASE_TS).is_err());
}

#[test]
fn snapshot_exposes_observable_state() {
    let mut engine = engine();
    engine.set_container_width(800);

    let snapshot = engine.snapshot_json_pretty().expect("snapshot");
    let value: serde_json::Value = serde_json::from_str(&snapshot).expect("json");
    assert_eq!(value["symbol"], "EUR/USD");
    assert_eq!(value["phase"], "Ready");
    assert_eq!(value["frame"]["candles"].as_array().expect("candles").len(), 30);
}
