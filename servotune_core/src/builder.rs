//! Construction and validation of a `TunerCore`.

use std::sync::Arc;

use servotune_traits::{
    Actuator, Button, CalibrationStore, Clock, Display, MonotonicClock, PositionSensor,
};

use crate::calibration::{CalibrationTable, Envelope, PulseRange, SLOT_COUNT, load_table};
use crate::config::{GestureCfg, MotionCfg, SensorCfg, SweepCfg};
use crate::controller::{Mode, TunerCore};
use crate::error::{BuildError, Result};
use crate::gesture::GestureRecognizer;
use crate::sweep::SweepResume;

/// Dynamic (boxed) controller used by the CLI; tests usually go through
/// `build_tuner` with concrete types instead.
pub type Tuner = TunerCore<
    Box<dyn PositionSensor>,
    Box<dyn Button>,
    Box<dyn Actuator>,
    Box<dyn Display>,
    Box<dyn CalibrationStore>,
>;

/// Everything configurable about a controller, with safe defaults.
#[derive(Debug, Clone)]
pub struct TunerParams {
    pub gesture: GestureCfg,
    pub motion: MotionCfg,
    pub sweep: SweepCfg,
    pub sensor: SensorCfg,
    pub envelope: Envelope,
    /// Range seeded into uncalibrated or unusable slots.
    pub factory_range: PulseRange,
    /// Slot driven until a calibration session selects another.
    pub active_slot: usize,
}

impl Default for TunerParams {
    fn default() -> Self {
        Self {
            gesture: GestureCfg::default(),
            motion: MotionCfg::default(),
            sweep: SweepCfg::default(),
            sensor: SensorCfg::default(),
            envelope: Envelope::default(),
            factory_range: CalibrationTable::FACTORY_RANGE,
            active_slot: 0,
        }
    }
}

fn validate_params(p: &TunerParams) -> Result<()> {
    if p.gesture.debounce_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "debounce_ms must be >= 1",
        )));
    }
    if p.gesture.double_press_window_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "double_press_window_ms must be >= 1",
        )));
    }
    if p.gesture.long_press_ms <= p.gesture.double_press_window_ms {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "long_press_ms must exceed the double-press window",
        )));
    }
    if p.motion.manual_step_us == 0 || p.motion.capture_step_us == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "motion step sizes must be >= 1",
        )));
    }
    if p.sweep.step_us == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sweep step must be >= 1",
        )));
    }
    if p.sweep.interval_min_ms == 0 || p.sweep.interval_min_ms > p.sweep.interval_max_ms {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sweep interval bounds must satisfy 1 <= min <= max",
        )));
    }
    if p.envelope.min_us >= p.envelope.max_us {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "envelope bounds must be strictly ordered",
        )));
    }
    if !p.factory_range.is_valid_within(p.envelope) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "factory range must sit inside the envelope",
        )));
    }
    if p.sensor.full_scale < 2 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sensor full scale must be >= 2",
        )));
    }
    if p.active_slot >= SLOT_COUNT {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "active slot out of range",
        )));
    }
    Ok(())
}

/// Build a statically-dispatched controller from concrete seams.
///
/// The calibration table is loaded from the store here, once, with factory
/// fallback and sanitation.
pub fn build_tuner<P, B, A, D, S>(
    sensor: P,
    button: B,
    actuator: A,
    display: D,
    mut store: S,
    params: TunerParams,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<TunerCore<P, B, A, D, S>>
where
    P: PositionSensor + 'static,
    B: Button + 'static,
    A: Actuator + 'static,
    D: Display + 'static,
    S: CalibrationStore + 'static,
{
    validate_params(&params)?;

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();

    let table = load_table(&mut store, params.factory_range, params.envelope);
    let sweep_resume = SweepResume::initial(&params.sweep);

    Ok(TunerCore {
        sensor,
        button,
        actuator,
        display,
        store,
        clock,
        epoch,
        gesture: GestureRecognizer::new(params.gesture),
        motion: params.motion,
        sweep_cfg: params.sweep,
        sensor_cfg: params.sensor,
        envelope: params.envelope,
        table,
        active_slot: params.active_slot,
        mode: Mode::Manual,
        sweep_resume,
        confirm_until_ms: None,
    })
}

impl Tuner {
    /// Start building a boxed controller.
    pub fn builder() -> TunerBuilder {
        TunerBuilder::default()
    }
}

/// Builder for the boxed `Tuner`. All seams are mandatory; everything else
/// falls back to `TunerParams::default`.
#[derive(Default)]
pub struct TunerBuilder {
    sensor: Option<Box<dyn PositionSensor>>,
    button: Option<Box<dyn Button>>,
    actuator: Option<Box<dyn Actuator>>,
    display: Option<Box<dyn Display>>,
    store: Option<Box<dyn CalibrationStore>>,
    params: Option<TunerParams>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
}

impl TunerBuilder {
    pub fn with_sensor(mut self, sensor: impl PositionSensor + 'static) -> Self {
        self.sensor = Some(Box::new(sensor));
        self
    }
    pub fn with_button(mut self, button: impl Button + 'static) -> Self {
        self.button = Some(Box::new(button));
        self
    }
    pub fn with_actuator(mut self, actuator: impl Actuator + 'static) -> Self {
        self.actuator = Some(Box::new(actuator));
        self
    }
    pub fn with_display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }
    pub fn with_store(mut self, store: impl CalibrationStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }
    pub fn with_params(mut self, params: TunerParams) -> Self {
        self.params = Some(params);
        self
    }
    /// Provide a custom clock; defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate and build. Missing seams yield typed `BuildError`s.
    pub fn try_build(self) -> Result<Tuner> {
        let sensor = self
            .sensor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensor))?;
        let button = self
            .button
            .ok_or_else(|| eyre::Report::new(BuildError::MissingButton))?;
        let actuator = self
            .actuator
            .ok_or_else(|| eyre::Report::new(BuildError::MissingActuator))?;
        let display = self
            .display
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;
        let store = self
            .store
            .ok_or_else(|| eyre::Report::new(BuildError::MissingStore))?;
        let params = self.params.unwrap_or_default();
        build_tuner(sensor, button, actuator, display, store, params, self.clock)
    }
}
