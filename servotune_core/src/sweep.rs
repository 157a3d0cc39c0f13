//! Autonomous back-and-forth sweep between the active slot's endpoints.
//!
//! Sweep position is autonomous; sweep speed follows the pot. The cadence is
//! re-derived only when the reading moves past a small deadband so ADC noise
//! does not jitter the speed.

use crate::calibration::PulseRange;
use crate::config::SweepCfg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Forward,
    Reverse,
}

impl SweepDirection {
    fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Direction and cadence carried across mode exits, so re-entering Sweep
/// resumes where it left off.
#[derive(Debug, Clone, Copy)]
pub struct SweepResume {
    pub direction: SweepDirection,
    pub interval_ms: u64,
}

impl SweepResume {
    pub fn initial(cfg: &SweepCfg) -> Self {
        Self {
            direction: SweepDirection::Forward,
            interval_ms: cfg.initial_interval_ms,
        }
    }
}

/// Live sweep state; exists only while the mode is Sweep.
#[derive(Debug, Clone)]
pub struct SweepState {
    direction: SweepDirection,
    interval_ms: u64,
    last_step_ms: u64,
    last_reading: u16,
}

impl SweepState {
    pub fn resume(resume: SweepResume, reading: u16, now_ms: u64) -> Self {
        Self {
            direction: resume.direction,
            interval_ms: resume.interval_ms,
            last_step_ms: now_ms,
            last_reading: reading,
        }
    }

    pub fn resume_point(&self) -> SweepResume {
        SweepResume {
            direction: self.direction,
            interval_ms: self.interval_ms,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Advance one tick. Returns the next pulse to command when a step is
    /// due, `None` while waiting out the cadence.
    ///
    /// The returned pulse never leaves `range`; hitting either endpoint
    /// clamps there and inverts the direction.
    pub fn tick(
        &mut self,
        cfg: &SweepCfg,
        range: PulseRange,
        current_pulse: u16,
        reading: u16,
        full_scale: u16,
        now_ms: u64,
    ) -> Option<u16> {
        if reading.abs_diff(self.last_reading) > cfg.reading_deadband {
            let span = cfg.interval_max_ms.saturating_sub(cfg.interval_min_ms);
            self.interval_ms = cfg.interval_min_ms
                + u64::from(reading.min(full_scale)) * span / u64::from(full_scale.max(1));
            self.last_reading = reading;
        }

        if now_ms.saturating_sub(self.last_step_ms) < self.interval_ms {
            return None;
        }
        self.last_step_ms = now_ms;

        let current = range.clamp(current_pulse);
        let next = match self.direction {
            SweepDirection::Forward => {
                let next = current.saturating_add(cfg.step_us);
                if next >= range.max_us {
                    self.direction = self.direction.flip();
                    range.max_us
                } else {
                    next
                }
            }
            SweepDirection::Reverse => {
                let next = current.saturating_sub(cfg.step_us);
                if next <= range.min_us {
                    self.direction = self.direction.flip();
                    range.min_us
                } else {
                    next
                }
            }
        };
        Some(next)
    }
}
