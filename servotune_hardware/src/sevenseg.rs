//! Shift-register-driven 3-digit 7-segment display (Raspberry Pi).
//!
//! A single 74HC595 feeds the segment lines (active low); one GPIO per digit
//! selects which position is lit. `show` runs one multiplex pass, holding
//! each digit briefly.

use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};
use servotune_traits::{Display, Glyph, HwResult};

use crate::error::HwError;

const SEG_A: u8 = 0b0000_0001;
const SEG_B: u8 = 0b0000_0100;
const SEG_C: u8 = 0b0001_0000;
const SEG_D: u8 = 0b0010_0000;
const SEG_E: u8 = 0b0100_0000;
const SEG_F: u8 = 0b0000_0010;
const SEG_G: u8 = 0b0000_1000;

const DIGIT_SEGMENTS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,                 // 2
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,                 // 3
    SEG_B | SEG_C | SEG_F | SEG_G,                         // 4
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,                 // 5
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G, // 8
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,         // 9
];

fn glyph_segments(glyph: Glyph) -> u8 {
    match glyph {
        Glyph::Digit(d) => DIGIT_SEGMENTS[usize::from(d.min(9))],
        Glyph::Blank => 0,
        Glyph::UpperC => SEG_A | SEG_D | SEG_E | SEG_F,
        Glyph::Dash => SEG_G,
    }
}

pub struct ShiftRegisterDisplay {
    latch: OutputPin,
    clock: OutputPin,
    data: OutputPin,
    digits: [OutputPin; 3],
    /// Hold time per digit during one multiplex pass.
    settle: Duration,
}

impl ShiftRegisterDisplay {
    pub fn new(
        latch_pin: u8,
        clock_pin: u8,
        data_pin: u8,
        digit_pins: [u8; 3],
    ) -> Result<Self, HwError> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let pin = |n: u8| -> Result<OutputPin, HwError> {
            Ok(gpio
                .get(n)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output_low())
        };
        Ok(Self {
            latch: pin(latch_pin)?,
            clock: pin(clock_pin)?,
            data: pin(data_pin)?,
            digits: [pin(digit_pins[0])?, pin(digit_pins[1])?, pin(digit_pins[2])?],
            settle: Duration::from_millis(2),
        })
    }

    /// Clock one byte into the register, LSB first.
    fn shift_out(&mut self, mut value: u8) {
        for _ in 0..8 {
            if value & 0x01 != 0 {
                self.data.set_high();
            } else {
                self.data.set_low();
            }
            self.clock.set_high();
            self.clock.set_low();
            value >>= 1;
        }
    }

    fn latch_byte(&mut self, value: u8) {
        self.latch.set_low();
        self.shift_out(value);
        self.latch.set_high();
    }
}

impl Display for ShiftRegisterDisplay {
    fn show(&mut self, frame: [Glyph; 3]) -> HwResult<()> {
        for idx in 0..3 {
            for digit in &mut self.digits {
                digit.set_low();
            }
            // Segments are active low behind the register.
            let segments = glyph_segments(frame[idx]);
            self.latch_byte(!segments);
            self.digits[idx].set_high();
            std::thread::sleep(self.settle);
        }
        Ok(())
    }
}
