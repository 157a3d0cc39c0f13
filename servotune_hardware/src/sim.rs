//! Simulated seams for development and the CLI's `--sim` mode.

use servotune_traits::{Actuator, Button, Display, Glyph, HwResult, PositionSensor};

use crate::error::HwError;

/// Deterministic pot stand-in: a slow triangle wave over the raw range, so a
/// simulated run exercises the whole travel without any wiring.
pub struct SimulatedPot {
    full_scale: u16,
    value: u16,
    rising: bool,
    step: u16,
}

impl SimulatedPot {
    pub fn new(full_scale: u16) -> Self {
        Self {
            full_scale,
            value: full_scale / 2,
            rising: true,
            step: 3,
        }
    }
}

impl PositionSensor for SimulatedPot {
    fn read(&mut self) -> HwResult<u16> {
        if self.rising {
            self.value = self.value.saturating_add(self.step).min(self.full_scale);
            if self.value == self.full_scale {
                self.rising = false;
            }
        } else {
            self.value = self.value.saturating_sub(self.step);
            if self.value == 0 {
                self.rising = true;
            }
        }
        Ok(self.value)
    }
}

/// Button that is never pressed; gesture paths are covered by core tests.
#[derive(Default)]
pub struct SimulatedButton;

impl Button for SimulatedButton {
    fn is_pressed(&mut self) -> HwResult<bool> {
        Ok(false)
    }
}

/// Actuator that tracks the commanded pulse and clamps like a real driver.
#[derive(Default)]
pub struct SimulatedActuator {
    bounds: Option<(u16, u16)>,
    pulse_us: u16,
}

impl Actuator for SimulatedActuator {
    fn attach(&mut self, min_pulse_us: u16, max_pulse_us: u16) -> HwResult<()> {
        self.bounds = Some((min_pulse_us, max_pulse_us));
        tracing::debug!(min_pulse_us, max_pulse_us, "simulated actuator attached");
        Ok(())
    }
    fn detach(&mut self) -> HwResult<()> {
        self.bounds = None;
        tracing::debug!("simulated actuator detached");
        Ok(())
    }
    fn command_pulse(&mut self, pulse_us: u16) -> HwResult<()> {
        let Some((min, max)) = self.bounds else {
            return Err(Box::new(HwError::Detached));
        };
        self.pulse_us = pulse_us.clamp(min, max);
        Ok(())
    }
    fn current_pulse(&self) -> u16 {
        self.pulse_us
    }
}

/// Prints the frame to stdout whenever it changes.
#[derive(Default)]
pub struct ConsoleDisplay {
    last: Option<[Glyph; 3]>,
}

fn glyph_char(g: Glyph) -> char {
    match g {
        Glyph::Digit(d) => char::from(b'0' + d.min(9)),
        Glyph::Blank => ' ',
        Glyph::UpperC => 'C',
        Glyph::Dash => '-',
    }
}

impl Display for ConsoleDisplay {
    fn show(&mut self, frame: [Glyph; 3]) -> HwResult<()> {
        if self.last != Some(frame) {
            self.last = Some(frame);
            println!(
                "[{}{}{}]",
                glyph_char(frame[0]),
                glyph_char(frame[1]),
                glyph_char(frame[2])
            );
        }
        Ok(())
    }
}
