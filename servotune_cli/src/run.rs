//! Hardware assembly and command execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::{Result, WrapErr};
use servotune_config::Config;
use servotune_core::runner::{self, RunParams};
use servotune_core::{CalibrationTable, PulseRange, SLOT_COUNT, Tuner, TunerParams, calibration};
use servotune_hardware::{
    ConsoleDisplay, FileStore, SimulatedActuator, SimulatedButton, SimulatedPot,
};

pub fn run(
    cfg: &Config,
    sim: bool,
    ticks: Option<u64>,
    tick_hz: Option<u32>,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let mut tuner = build(cfg, sim)?;
    let params = RunParams {
        tick_hz: tick_hz.unwrap_or(cfg.runner.tick_hz),
        max_ticks: ticks,
    };
    runner::run(&mut tuner, &params, move || {
        shutdown.load(Ordering::Relaxed)
    })
}

pub fn self_check(cfg: &Config) -> Result<()> {
    let factory: PulseRange = (&cfg.defaults).into();
    let record = CalibrationTable::factory(factory).encode();
    let mut tuner = Tuner::builder()
        .with_sensor(SimulatedPot::new(cfg.sensor.full_scale))
        .with_button(SimulatedButton)
        .with_actuator(SimulatedActuator::default())
        .with_display(ConsoleDisplay::default())
        .with_store(servotune_core::mocks::MemoryStore::preloaded(record))
        .with_params(TunerParams::from(cfg))
        .try_build()?;
    let params = RunParams {
        tick_hz: cfg.runner.tick_hz,
        max_ticks: Some(25),
    };
    runner::run(&mut tuner, &params, || false)?;
    println!("self-check ok");
    Ok(())
}

pub fn show_cal(cfg: &Config) -> Result<()> {
    let factory: PulseRange = (&cfg.defaults).into();
    let seed = CalibrationTable::factory(factory).encode();
    let mut store =
        FileStore::open(&cfg.store.path, &seed).wrap_err("opening calibration store")?;
    let table = calibration::load_table(&mut store, factory, (&cfg.envelope).into());
    for idx in 0..SLOT_COUNT {
        let slot = table.slot(idx);
        println!("slot {idx}: {} .. {} us", slot.min_us, slot.max_us);
    }
    Ok(())
}

fn build(cfg: &Config, sim: bool) -> Result<Tuner> {
    let factory: PulseRange = (&cfg.defaults).into();
    let seed = CalibrationTable::factory(factory).encode();
    let store =
        FileStore::open(&cfg.store.path, &seed).wrap_err("opening calibration store")?;
    let params = TunerParams::from(cfg);

    #[cfg(feature = "hardware")]
    if !sim {
        use servotune_hardware::{GpioButton, Mcp3008Pot, PwmServo, ShiftRegisterDisplay};
        let pins = &cfg.pins;
        return Tuner::builder()
            .with_sensor(Mcp3008Pot::new(pins.pot_channel, cfg.sensor.samples)?)
            .with_button(GpioButton::new(pins.button)?)
            .with_actuator(PwmServo::new(pins.pwm_channel)?)
            .with_display(ShiftRegisterDisplay::new(
                pins.display_latch,
                pins.display_clock,
                pins.display_data,
                pins.digit_pins,
            )?)
            .with_store(store)
            .with_params(params)
            .try_build();
    }
    #[cfg(not(feature = "hardware"))]
    if !sim {
        tracing::info!("built without hardware support; using simulated peripherals");
    }

    Tuner::builder()
        .with_sensor(SimulatedPot::new(cfg.sensor.full_scale))
        .with_button(SimulatedButton)
        .with_actuator(SimulatedActuator::default())
        .with_display(ConsoleDisplay::default())
        .with_store(store)
        .with_params(params)
        .try_build()
}
