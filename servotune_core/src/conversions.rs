//! Mapping from the serde-facing `servotune_config` schema into the plain
//! structs the controller consumes.

use crate::builder::TunerParams;
use crate::calibration::{Envelope, PulseRange};
use crate::config::{GestureCfg, MotionCfg, SensorCfg, SweepCfg};

impl From<&servotune_config::GestureCfg> for GestureCfg {
    fn from(c: &servotune_config::GestureCfg) -> Self {
        Self {
            debounce_ms: c.debounce_ms,
            long_press_ms: c.long_press_ms,
            double_press_window_ms: c.double_press_window_ms,
        }
    }
}

impl From<&servotune_config::MotionCfg> for MotionCfg {
    fn from(c: &servotune_config::MotionCfg) -> Self {
        Self {
            manual_step_us: c.manual_step_us,
            capture_step_us: c.capture_step_us,
        }
    }
}

impl From<&servotune_config::SweepCfg> for SweepCfg {
    fn from(c: &servotune_config::SweepCfg) -> Self {
        Self {
            step_us: c.step_us,
            interval_min_ms: c.interval_min_ms,
            interval_max_ms: c.interval_max_ms,
            initial_interval_ms: c.initial_interval_ms,
            reading_deadband: c.reading_deadband,
        }
    }
}

impl From<&servotune_config::SensorCfg> for SensorCfg {
    fn from(c: &servotune_config::SensorCfg) -> Self {
        Self {
            full_scale: c.full_scale,
        }
    }
}

impl From<&servotune_config::EnvelopeCfg> for Envelope {
    fn from(c: &servotune_config::EnvelopeCfg) -> Self {
        Self {
            min_us: c.min_us,
            max_us: c.max_us,
        }
    }
}

impl From<&servotune_config::FactoryRangeCfg> for PulseRange {
    fn from(c: &servotune_config::FactoryRangeCfg) -> Self {
        Self {
            min_us: c.min_us,
            max_us: c.max_us,
        }
    }
}

impl From<&servotune_config::Config> for TunerParams {
    fn from(c: &servotune_config::Config) -> Self {
        Self {
            gesture: (&c.gesture).into(),
            motion: (&c.motion).into(),
            sweep: (&c.sweep).into(),
            sensor: (&c.sensor).into(),
            envelope: (&c.envelope).into(),
            factory_range: (&c.defaults).into(),
            active_slot: 0,
        }
    }
}
