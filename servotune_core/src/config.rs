//! Plain config structs consumed by the controller.
//!
//! The serde-facing schema lives in `servotune_config`; `conversions` maps it
//! into these.

/// Button gesture timing windows (milliseconds).
#[derive(Debug, Clone)]
pub struct GestureCfg {
    /// Raw level must hold this long before a debounced edge is accepted.
    pub debounce_ms: u64,
    /// Holds at least this long classify as a long press.
    pub long_press_ms: u64,
    /// A second tap within this window of the first classifies as a double tap.
    pub double_press_window_ms: u64,
}

impl Default for GestureCfg {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            long_press_ms: 1000,
            double_press_window_ms: 300,
        }
    }
}

/// Rate limits for smoothed motion, in microseconds of pulse per tick.
#[derive(Debug, Clone)]
pub struct MotionCfg {
    /// Step bound while tracking the pot inside the active slot's range.
    pub manual_step_us: u16,
    /// Step bound during endpoint capture over the full envelope.
    pub capture_step_us: u16,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            manual_step_us: 10,
            capture_step_us: 5,
        }
    }
}

/// Auto-sweep tuning.
#[derive(Debug, Clone)]
pub struct SweepCfg {
    /// Pulse change per sweep step (µs).
    pub step_us: u16,
    /// Fastest cadence the pot can select (ms).
    pub interval_min_ms: u64,
    /// Slowest cadence the pot can select (ms).
    pub interval_max_ms: u64,
    /// Cadence until the pot first moves (ms).
    pub initial_interval_ms: u64,
    /// Pot must move more than this many raw counts before the cadence is
    /// re-derived.
    pub reading_deadband: u16,
}

impl Default for SweepCfg {
    fn default() -> Self {
        Self {
            step_us: 10,
            interval_min_ms: 5,
            interval_max_ms: 50,
            initial_interval_ms: 15,
            reading_deadband: 5,
        }
    }
}

/// Position sensor scaling.
#[derive(Debug, Clone)]
pub struct SensorCfg {
    /// Largest raw reading the sensor produces.
    pub full_scale: u16,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self { full_scale: 1023 }
    }
}
