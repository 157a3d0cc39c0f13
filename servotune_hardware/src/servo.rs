//! Hardware PWM servo driver (Raspberry Pi).
//!
//! Standard hobby-servo timing: 20 ms period, position proportional to the
//! pulse high-time. The attach bounds act as a hard clamp so no command can
//! leave the caller-supplied envelope.

use std::time::Duration;

use rppal::pwm::{Channel, Polarity, Pwm};
use servotune_traits::{Actuator, HwResult};

use crate::error::{HwError, boxed};

const PERIOD: Duration = Duration::from_millis(20); // 50 Hz

pub struct PwmServo {
    pwm: Pwm,
    bounds: Option<(u16, u16)>,
    pulse_us: u16,
}

impl PwmServo {
    /// `channel` 0 maps to BCM GPIO 18, 1 to BCM GPIO 19.
    pub fn new(channel: u8) -> Result<Self, HwError> {
        let channel = if channel == 0 {
            Channel::Pwm0
        } else {
            Channel::Pwm1
        };
        let pwm = Pwm::with_period(channel, PERIOD, Duration::ZERO, Polarity::Normal, false)
            .map_err(|e| HwError::Pwm(e.to_string()))?;
        Ok(Self {
            pwm,
            bounds: None,
            pulse_us: 0,
        })
    }
}

impl Actuator for PwmServo {
    fn attach(&mut self, min_pulse_us: u16, max_pulse_us: u16) -> HwResult<()> {
        self.pwm
            .enable()
            .map_err(|e| boxed(HwError::Pwm(e.to_string())))?;
        self.bounds = Some((min_pulse_us, max_pulse_us));
        tracing::debug!(min_pulse_us, max_pulse_us, "servo attached");
        Ok(())
    }

    fn detach(&mut self) -> HwResult<()> {
        self.pwm
            .disable()
            .map_err(|e| boxed(HwError::Pwm(e.to_string())))?;
        self.bounds = None;
        tracing::debug!("servo detached");
        Ok(())
    }

    fn command_pulse(&mut self, pulse_us: u16) -> HwResult<()> {
        let Some((min, max)) = self.bounds else {
            return Err(Box::new(HwError::Detached));
        };
        let clamped = pulse_us.clamp(min, max);
        self.pwm
            .set_pulse_width(Duration::from_micros(u64::from(clamped)))
            .map_err(|e| boxed(HwError::Pwm(e.to_string())))?;
        self.pulse_us = clamped;
        Ok(())
    }

    fn current_pulse(&self) -> u16 {
        self.pulse_us
    }
}
