//! GPIO button input (Raspberry Pi), pulled up; pressed reads low.

use rppal::gpio::{Gpio, InputPin};
use servotune_traits::{Button, HwResult};

use crate::error::HwError;

pub struct GpioButton {
    pin: InputPin,
}

impl GpioButton {
    pub fn new(pin: u8) -> Result<Self, HwError> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let pin = gpio
            .get(pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input_pullup();
        Ok(Self { pin })
    }
}

impl Button for GpioButton {
    fn is_pressed(&mut self) -> HwResult<bool> {
        Ok(self.pin.is_low())
    }
}
