#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the servo tuner.
//!
//! `Config` and its sub-structs are deserialized from TOML and validated.
//! Every section has defaults matching the reference hardware, so an empty
//! file (or no file at all) yields a runnable configuration.

use serde::Deserialize;

/// GPIO/peripheral assignment (BCM numbering on the Pi).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Pins {
    /// MCP3008 channel the potentiometer is wired to
    pub pot_channel: u8,
    /// Button input, pulled up (pressed = low)
    pub button: u8,
    /// Shift register STCP
    pub display_latch: u8,
    /// Shift register SHCP
    pub display_clock: u8,
    /// Shift register DS
    pub display_data: u8,
    /// Common pins of the three display digits, leftmost first
    pub digit_pins: [u8; 3],
    /// Hardware PWM channel driving the servo (0 or 1)
    pub pwm_channel: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            pot_channel: 0,
            button: 17,
            display_latch: 22,
            display_clock: 27,
            display_data: 23,
            digit_pins: [5, 6, 13],
            pwm_channel: 0,
        }
    }
}

/// Button gesture timing windows.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GestureCfg {
    /// Raw level must hold this long before a debounced edge is accepted
    pub debounce_ms: u64,
    /// Holds at least this long classify as a long press
    pub long_press_ms: u64,
    /// A second tap within this window of the first classifies as a double tap
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

/// Rate limits for smoothed motion.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MotionCfg {
    /// Max pulse change per tick while tracking the pot (µs)
    pub manual_step_us: u16,
    /// Max pulse change per tick during endpoint capture (µs); smaller for
    /// finer control over the full envelope
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

/// Auto-sweep behavior.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SweepCfg {
    /// Pulse change per sweep step (µs)
    pub step_us: u16,
    /// Fastest step cadence the pot can select (ms)
    pub interval_min_ms: u64,
    /// Slowest step cadence the pot can select (ms)
    pub interval_max_ms: u64,
    /// Cadence used until the pot first moves (ms)
    pub initial_interval_ms: u64,
    /// Pot must move more than this many raw counts before the cadence
    /// is re-derived
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

/// Hardware-safe absolute pulse bounds, wider than any calibrated range.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct EnvelopeCfg {
    pub min_us: u16,
    pub max_us: u16,
}

impl Default for EnvelopeCfg {
    fn default() -> Self {
        Self {
            min_us: 400,
            max_us: 2600,
        }
    }
}

/// Factory-default travel range seeded into uncalibrated slots.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct FactoryRangeCfg {
    pub min_us: u16,
    pub max_us: u16,
}

impl Default for FactoryRangeCfg {
    fn default() -> Self {
        Self {
            min_us: 600,
            max_us: 2400,
        }
    }
}

/// Position sensor scaling.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorCfg {
    /// Largest raw reading the sensor produces (10-bit ADC: 1023)
    pub full_scale: u16,
    /// Raw samples averaged per reading
    pub samples: u8,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            full_scale: 1023,
            samples: 8,
        }
    }
}

/// Calibration record location.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreCfg {
    /// Path of the 12-byte calibration record file
    pub path: String,
}

impl Default for StoreCfg {
    fn default() -> Self {
        Self {
            path: "servotune_cal.bin".into(),
        }
    }
}

/// Control loop pacing.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerCfg {
    /// Tick rate of the control loop in Hz
    pub tick_hz: u32,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self { tick_hz: 200 }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub gesture: GestureCfg,
    pub motion: MotionCfg,
    pub sweep: SweepCfg,
    pub envelope: EnvelopeCfg,
    pub defaults: FactoryRangeCfg,
    pub sensor: SensorCfg,
    pub store: StoreCfg,
    pub runner: RunnerCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// Reject configurations the controller cannot run safely.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.gesture.debounce_ms == 0 {
            eyre::bail!("gesture.debounce_ms must be >= 1");
        }
        if self.gesture.double_press_window_ms == 0 {
            eyre::bail!("gesture.double_press_window_ms must be >= 1");
        }
        if self.gesture.long_press_ms <= self.gesture.double_press_window_ms {
            eyre::bail!("gesture.long_press_ms must exceed the double-press window");
        }
        if self.motion.manual_step_us == 0 || self.motion.capture_step_us == 0 {
            eyre::bail!("motion step sizes must be >= 1 µs");
        }
        if self.sweep.step_us == 0 {
            eyre::bail!("sweep.step_us must be >= 1 µs");
        }
        if self.sweep.interval_min_ms == 0 {
            eyre::bail!("sweep.interval_min_ms must be >= 1");
        }
        if self.sweep.interval_min_ms > self.sweep.interval_max_ms {
            eyre::bail!("sweep.interval_min_ms must not exceed sweep.interval_max_ms");
        }
        if self.envelope.min_us >= self.envelope.max_us {
            eyre::bail!("envelope.min_us must be below envelope.max_us");
        }
        if self.defaults.min_us >= self.defaults.max_us {
            eyre::bail!("defaults.min_us must be below defaults.max_us");
        }
        if self.defaults.min_us < self.envelope.min_us || self.defaults.max_us > self.envelope.max_us
        {
            eyre::bail!("factory default range must sit inside the hardware envelope");
        }
        if self.sensor.full_scale < 2 {
            eyre::bail!("sensor.full_scale must be >= 2");
        }
        if self.sensor.samples == 0 {
            eyre::bail!("sensor.samples must be >= 1");
        }
        if self.store.path.is_empty() {
            eyre::bail!("store.path must not be empty");
        }
        if self.runner.tick_hz == 0 {
            eyre::bail!("runner.tick_hz must be >= 1");
        }
        Ok(())
    }
}
