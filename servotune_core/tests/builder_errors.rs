use servotune_core::mocks::{
    FakeActuator, LastFrameDisplay, MemoryStore, SharedButton, SharedSensor,
};
use servotune_core::{GestureCfg, Tuner, TunerParams};

fn full_builder() -> servotune_core::TunerBuilder {
    Tuner::builder()
        .with_sensor(SharedSensor::new(0))
        .with_button(SharedButton::default())
        .with_actuator(FakeActuator::default())
        .with_display(LastFrameDisplay::default())
        .with_store(MemoryStore::default())
}

#[test]
fn missing_seams_yield_typed_errors() {
    let err = Tuner::builder().try_build().expect_err("must fail");
    assert!(format!("{err}").contains("missing position sensor"));

    let err = Tuner::builder()
        .with_sensor(SharedSensor::new(0))
        .try_build()
        .expect_err("must fail");
    assert!(format!("{err}").contains("missing button"));

    let err = Tuner::builder()
        .with_sensor(SharedSensor::new(0))
        .with_button(SharedButton::default())
        .with_actuator(FakeActuator::default())
        .with_display(LastFrameDisplay::default())
        .try_build()
        .expect_err("must fail");
    assert!(format!("{err}").contains("missing calibration store"));
}

#[test]
fn zero_debounce_is_rejected() {
    let params = TunerParams {
        gesture: GestureCfg {
            debounce_ms: 0,
            ..GestureCfg::default()
        },
        ..TunerParams::default()
    };
    let err = full_builder()
        .with_params(params)
        .try_build()
        .expect_err("must fail");
    assert!(format!("{err}").contains("debounce_ms"));
}

#[test]
fn long_press_must_exceed_double_press_window() {
    let params = TunerParams {
        gesture: GestureCfg {
            long_press_ms: 300,
            double_press_window_ms: 300,
            ..GestureCfg::default()
        },
        ..TunerParams::default()
    };
    let err = full_builder()
        .with_params(params)
        .try_build()
        .expect_err("must fail");
    assert!(format!("{err}").contains("long_press_ms"));
}

#[test]
fn factory_range_must_fit_envelope() {
    let params = TunerParams {
        factory_range: servotune_core::PulseRange {
            min_us: 100,
            max_us: 2400,
        },
        ..TunerParams::default()
    };
    let err = full_builder()
        .with_params(params)
        .try_build()
        .expect_err("must fail");
    assert!(format!("{err}").contains("factory range"));
}

#[test]
fn active_slot_must_be_in_range() {
    let params = TunerParams {
        active_slot: 3,
        ..TunerParams::default()
    };
    let err = full_builder()
        .with_params(params)
        .try_build()
        .expect_err("must fail");
    assert!(format!("{err}").contains("active slot"));
}

#[test]
fn defaults_build_cleanly() {
    full_builder().try_build().expect("default params build");
}
