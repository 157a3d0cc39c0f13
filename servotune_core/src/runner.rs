//! The outer control loop: attach, tick at a fixed cadence, detach.

use std::time::Duration;

use servotune_traits::{Actuator, Button, CalibrationStore, Display, PositionSensor};

use crate::controller::TunerCore;
use crate::error::Result;
use crate::util::period_us;

/// Loop pacing and termination.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Tick rate in Hz.
    pub tick_hz: u32,
    /// Stop after this many ticks; `None` runs until `should_stop` fires.
    pub max_ticks: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            tick_hz: 200,
            max_ticks: None,
        }
    }
}

/// Drive the controller until `should_stop` returns true (or `max_ticks`
/// elapse). The actuator is detached on the way out, including when a tick
/// fails.
pub fn run<P, B, A, D, S>(
    tuner: &mut TunerCore<P, B, A, D, S>,
    params: &RunParams,
    should_stop: impl Fn() -> bool,
) -> Result<()>
where
    P: PositionSensor,
    B: Button,
    A: Actuator,
    D: Display,
    S: CalibrationStore,
{
    tuner.startup()?;
    let period = Duration::from_micros(period_us(params.tick_hz));
    tracing::info!(tick_hz = params.tick_hz, "control loop started");

    let mut ticks: u64 = 0;
    let outcome = loop {
        if should_stop() {
            tracing::info!(ticks, "stop requested");
            break Ok(());
        }
        match tuner.tick() {
            Ok(report) => {
                tracing::trace!(mode = ?report.mode, pulse_us = report.pulse_us, "tick");
            }
            Err(e) => break Err(e),
        }
        ticks += 1;
        if let Some(max) = params.max_ticks
            && ticks >= max
        {
            tracing::info!(ticks, "tick budget reached");
            break Ok(());
        }
        tuner.pace(period);
    };

    if let Err(e) = tuner.shutdown() {
        tracing::warn!(error = %e, "detach failed during shutdown");
    }
    outcome
}
