#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core control logic for a pot-driven PWM actuator (hardware-agnostic).
//!
//! All hardware interactions go through the `servotune_traits` seams.
//!
//! ## Architecture
//!
//! - **Gestures**: debounce + short/long/double press classification
//!   (`gesture` module)
//! - **Modes**: manual tracking, auto-sweep, center, calibration, dispatched
//!   per tick (`controller`)
//! - **Motion**: rate-limited convergence toward a target pulse (`motion`)
//! - **Calibration**: three persisted min/max slots and the endpoint-capture
//!   session (`calibration`, `session`)
//! - **Display**: per-mode frame composition (`frame`)
//!
//! The whole stack is single-threaded and tick-driven: one loop iteration
//! polls the inputs, advances every state machine, and issues at most one
//! actuator command and one display refresh.

pub mod builder;
pub mod calibration;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod mocks;
pub mod motion;
pub mod runner;
pub mod session;
pub mod sweep;
pub mod util;

pub use builder::{Tuner, TunerBuilder, TunerParams, build_tuner};
pub use calibration::{
    CalibrationTable, Envelope, PulseRange, SLOT_COUNT, STARTUP_PULSE_US, slot_for_reading,
};
pub use config::{GestureCfg, MotionCfg, SensorCfg, SweepCfg};
pub use controller::{Mode, ModeKind, TickReport, TunerCore};
pub use error::{BuildError, Result, TunerError};
pub use frame::{CONFIRM_FRAME, Frame};
pub use gesture::{Gesture, GestureRecognizer};
pub use session::{CalibrationPhase, CalibrationSession};
pub use sweep::{SweepDirection, SweepResume, SweepState};
