//! The mode machine and its per-tick dispatch.
//!
//! One `TunerCore` owns every piece of mutable state: the gesture
//! recognizer, the calibration table, the active mode with its per-variant
//! state, and the hardware seams. Each tick reads time once, consumes the
//! sensor and button, applies at most one gesture transition, runs the
//! active mode's motion policy, and hands one frame to the display.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use servotune_traits::{Actuator, Button, CalibrationStore, Clock, Display, PositionSensor};

use crate::calibration::{CalibrationTable, Envelope, PulseRange, STARTUP_PULSE_US, slot_for_reading};
use crate::config::{MotionCfg, SensorCfg, SweepCfg};
use crate::error::{Result, TunerError, map_hw_error};
use crate::frame::{CONFIRM_FRAME, Frame, number_frame, slot_select_frame};
use crate::gesture::{Gesture, GestureRecognizer};
use crate::motion::{advance, map_range};
use crate::session::{CalibrationPhase, CalibrationSession};
use crate::sweep::{SweepResume, SweepState};

/// How long the confirmation frame holds after a calibration persists (ms).
const CONFIRM_HOLD_MS: u64 = 800;

/// Top-level mode with its per-variant state.
#[derive(Debug)]
pub enum Mode {
    Manual,
    Sweep(SweepState),
    /// One-shot: commands the midpoint of the active slot's range, then
    /// returns to Manual on the same tick.
    Center,
    Calibrate(CalibrationSession),
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Manual => ModeKind::Manual,
            Self::Sweep(_) => ModeKind::Sweep,
            Self::Center => ModeKind::Center,
            Self::Calibrate(_) => ModeKind::Calibrate,
        }
    }
}

/// Payload-free mode tag for reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Manual,
    Sweep,
    Center,
    Calibrate,
}

/// What one tick did; returned for observability and tests.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// Mode after gesture handling, before the Center one-shot falls back
    /// to Manual.
    pub mode: ModeKind,
    pub gesture: Option<Gesture>,
    pub frame: Frame,
    /// Commanded pulse after this tick's motion policy.
    pub pulse_us: u16,
}

pub struct TunerCore<P, B, A, D, S>
where
    P: PositionSensor,
    B: Button,
    A: Actuator,
    D: Display,
    S: CalibrationStore,
{
    pub(crate) sensor: P,
    pub(crate) button: B,
    pub(crate) actuator: A,
    pub(crate) display: D,
    pub(crate) store: S,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) gesture: GestureRecognizer,
    pub(crate) motion: MotionCfg,
    pub(crate) sweep_cfg: SweepCfg,
    pub(crate) sensor_cfg: SensorCfg,
    pub(crate) envelope: Envelope,
    pub(crate) table: CalibrationTable,
    pub(crate) active_slot: usize,
    pub(crate) mode: Mode,
    pub(crate) sweep_resume: SweepResume,
    pub(crate) confirm_until_ms: Option<u64>,
}

impl<P, B, A, D, S> core::fmt::Debug for TunerCore<P, B, A, D, S>
where
    P: PositionSensor,
    B: Button,
    A: Actuator,
    D: Display,
    S: CalibrationStore,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TunerCore")
            .field("mode", &self.mode.kind())
            .field("active_slot", &self.active_slot)
            .field("pulse_us", &self.actuator.current_pulse())
            .finish()
    }
}

impl<P, B, A, D, S> TunerCore<P, B, A, D, S>
where
    P: PositionSensor,
    B: Button,
    A: Actuator,
    D: Display,
    S: CalibrationStore,
{
    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    pub fn table(&self) -> &CalibrationTable {
        &self.table
    }

    pub fn current_pulse(&self) -> u16 {
        self.actuator.current_pulse()
    }

    /// Sleep on the controller's clock (used by the runner for pacing).
    pub fn pace(&self, d: Duration) {
        self.clock.sleep(d);
    }

    /// Attach the actuator with the active slot's range and take the startup
    /// posture.
    pub fn startup(&mut self) -> Result<()> {
        let range = self.table.slot(self.active_slot);
        self.actuator
            .attach(range.min_us, range.max_us)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("attaching actuator")?;
        self.actuator
            .command_pulse(range.clamp(STARTUP_PULSE_US))
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("taking startup posture")?;
        tracing::info!(
            slot = self.active_slot,
            min_us = range.min_us,
            max_us = range.max_us,
            "actuator attached"
        );
        Ok(())
    }

    /// Release the actuator (best-effort companion to `startup`).
    pub fn shutdown(&mut self) -> Result<()> {
        self.actuator
            .detach()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("detaching actuator")?;
        tracing::info!("actuator detached");
        Ok(())
    }

    /// One iteration of the control loop.
    pub fn tick(&mut self) -> Result<TickReport> {
        // Single time read per tick; every comparison below uses this value.
        let now_ms = self.clock.ms_since(self.epoch);

        let reading = self
            .sensor
            .read()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("reading position sensor")?;
        let pressed = self
            .button
            .is_pressed()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("reading button")?;

        let gesture = self.gesture.update(pressed, now_ms);
        if let Some(g) = gesture {
            tracing::trace!(gesture = ?g, now_ms, "gesture");
            self.apply_gesture(g, reading, now_ms)?;
        }

        if let Some(until) = self.confirm_until_ms
            && now_ms >= until
        {
            self.confirm_until_ms = None;
        }

        let mode = self.mode.kind();
        self.run_mode_policy(reading, now_ms)?;

        let frame = self.compose_frame(now_ms);
        self.display
            .show(frame)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("refreshing display")?;

        Ok(TickReport {
            mode,
            gesture,
            frame,
            pulse_us: self.actuator.current_pulse(),
        })
    }

    // ── Gesture transitions ──────────────────────────────────────────────

    fn apply_gesture(&mut self, gesture: Gesture, reading: u16, now_ms: u64) -> Result<()> {
        match gesture {
            Gesture::PressStart | Gesture::ReleaseShort => Ok(()),
            Gesture::ReleaseLong => self.on_long_press(reading),
            Gesture::DoubleTap => {
                self.on_double_tap(reading, now_ms);
                Ok(())
            }
            Gesture::TapTimeout => self.on_tap_timeout(reading, now_ms),
        }
    }

    fn on_long_press(&mut self, reading: u16) -> Result<()> {
        let selecting = matches!(
            &self.mode,
            Mode::Calibrate(s) if s.phase == CalibrationPhase::SelectingSlot
        );
        if selecting {
            // Commit the band under the pot as the active slot; endpoints
            // stay untouched.
            let slot = slot_for_reading(reading, self.sensor_cfg.full_scale);
            let range = self.table.slot(slot);
            self.active_slot = slot;
            self.reattach(range)?;
            self.mode = Mode::Manual;
            tracing::info!(slot, "active slot committed; leaving calibration");
        } else if !matches!(self.mode, Mode::Calibrate(_)) {
            self.stash_sweep();
            self.mode = Mode::Center;
            tracing::info!("centering");
        }
        Ok(())
    }

    fn on_double_tap(&mut self, reading: u16, now_ms: u64) {
        match &mut self.mode {
            Mode::Manual => {
                self.mode = Mode::Sweep(SweepState::resume(self.sweep_resume, reading, now_ms));
                tracing::info!("sweep mode");
            }
            Mode::Sweep(state) => {
                self.sweep_resume = state.resume_point();
                self.mode = Mode::Manual;
                tracing::info!("manual mode");
            }
            _ => {}
        }
    }

    fn on_tap_timeout(&mut self, reading: u16, now_ms: u64) -> Result<()> {
        let Mode::Calibrate(session) = &mut self.mode else {
            self.stash_sweep();
            let session = CalibrationSession::begin(reading, self.sensor_cfg.full_scale);
            tracing::info!(slot = session.slot, "entering calibration");
            self.mode = Mode::Calibrate(session);
            return Ok(());
        };

        match session.phase {
            CalibrationPhase::SelectingSlot => {
                session.lock_slot();
                let slot = session.slot;
                // Reattach with the full hardware envelope so captured
                // pulses are unclamped by prior calibration.
                let envelope = self.envelope.as_range();
                self.reattach(envelope)?;
                tracing::info!(slot, "slot locked; capturing minimum endpoint");
            }
            CalibrationPhase::AwaitingMin => {
                let pulse = self.actuator.current_pulse();
                session.capture_min(pulse);
                tracing::info!(pulse, "minimum endpoint captured");
            }
            CalibrationPhase::AwaitingMax => {
                let pulse = self.actuator.current_pulse();
                let Some(range) = session.capture_max(pulse) else {
                    tracing::warn!(pulse, "endpoint equals captured minimum; keep adjusting");
                    return Ok(());
                };
                let slot = session.slot;
                self.finish_session(slot, range, now_ms)?;
            }
        }
        Ok(())
    }

    /// Persist a completed session and return to Manual with the new range.
    fn finish_session(&mut self, slot: usize, range: PulseRange, now_ms: u64) -> Result<()> {
        self.table.set_slot(slot, range);
        let record = self.table.encode();
        self.store
            .write_record(&record)
            .map_err(|e| eyre::Report::new(TunerError::Store(e.to_string())))
            .wrap_err("persisting calibration")?;
        self.active_slot = slot;
        self.reattach(range)?;
        self.confirm_until_ms = Some(now_ms + CONFIRM_HOLD_MS);
        self.mode = Mode::Manual;
        tracing::info!(
            slot,
            min_us = range.min_us,
            max_us = range.max_us,
            "calibration persisted"
        );
        Ok(())
    }

    /// Remember sweep direction and cadence when a gesture leaves Sweep.
    fn stash_sweep(&mut self) {
        if let Mode::Sweep(state) = &self.mode {
            self.sweep_resume = state.resume_point();
        }
    }

    fn reattach(&mut self, range: PulseRange) -> Result<()> {
        self.actuator
            .detach()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("detaching actuator")?;
        self.actuator
            .attach(range.min_us, range.max_us)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("attaching actuator")?;
        Ok(())
    }

    // ── Per-tick mode policies ───────────────────────────────────────────

    fn run_mode_policy(&mut self, reading: u16, now_ms: u64) -> Result<()> {
        match &mut self.mode {
            Mode::Manual => {
                let range = self.table.slot(self.active_slot);
                track(
                    &mut self.actuator,
                    reading,
                    self.sensor_cfg.full_scale,
                    range,
                    self.motion.manual_step_us,
                )
            }
            Mode::Center => {
                let range = self.table.slot(self.active_slot);
                self.actuator
                    .command_pulse(range.midpoint())
                    .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                    .wrap_err("commanding center position")?;
                self.mode = Mode::Manual;
                Ok(())
            }
            Mode::Sweep(state) => {
                let range = self.table.slot(self.active_slot);
                let current = self.actuator.current_pulse();
                if let Some(next) = state.tick(
                    &self.sweep_cfg,
                    range,
                    current,
                    reading,
                    self.sensor_cfg.full_scale,
                    now_ms,
                ) {
                    self.actuator
                        .command_pulse(next)
                        .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                        .wrap_err("commanding sweep step")?;
                }
                Ok(())
            }
            Mode::Calibrate(session) => match session.phase {
                CalibrationPhase::SelectingSlot => {
                    session.preview_slot(reading, self.sensor_cfg.full_scale);
                    Ok(())
                }
                CalibrationPhase::AwaitingMin | CalibrationPhase::AwaitingMax => track(
                    &mut self.actuator,
                    reading,
                    self.sensor_cfg.full_scale,
                    self.envelope.as_range(),
                    self.motion.capture_step_us,
                ),
            },
        }
    }

    // ── Display ──────────────────────────────────────────────────────────

    fn compose_frame(&self, now_ms: u64) -> Frame {
        if let Some(until) = self.confirm_until_ms
            && now_ms < until
        {
            return CONFIRM_FRAME;
        }
        match &self.mode {
            Mode::Sweep(state) => {
                number_frame(state.interval_ms().min(u64::from(u16::MAX)) as u16)
            }
            Mode::Calibrate(session) => match session.phase {
                CalibrationPhase::SelectingSlot => slot_select_frame(session.slot),
                CalibrationPhase::AwaitingMin | CalibrationPhase::AwaitingMax => {
                    let envelope = self.envelope;
                    number_frame(map_range(
                        self.actuator.current_pulse(),
                        envelope.min_us,
                        envelope.max_us,
                        0,
                        180,
                    ))
                }
            },
            Mode::Manual | Mode::Center => {
                let range = self.table.slot(self.active_slot);
                number_frame(map_range(
                    self.actuator.current_pulse(),
                    range.min_us,
                    range.max_us,
                    0,
                    180,
                ))
            }
        }
    }
}

/// Smoothed tracking of the pot mapped into `range`, shared by Manual mode
/// and the endpoint-capture phases.
fn track<A: Actuator>(
    actuator: &mut A,
    reading: u16,
    full_scale: u16,
    range: PulseRange,
    step_us: u16,
) -> Result<()> {
    let target = map_range(reading, 0, full_scale, range.min_us, range.max_us);
    let current = actuator.current_pulse();
    let next = advance(current, target, step_us);
    if next != current {
        actuator
            .command_pulse(next)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("commanding actuator")?;
    }
    Ok(())
}
