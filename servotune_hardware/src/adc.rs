//! Potentiometer input via an MCP3008 ADC on SPI (Raspberry Pi).
//!
//! Readings are averaged over a fixed number of raw samples; the controller
//! only ever sees the averaged value.

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use servotune_traits::{HwResult, PositionSensor};
use tracing::trace;

use crate::error::{HwError, boxed};

const SPI_CLOCK_HZ: u32 = 1_350_000;

pub struct Mcp3008Pot {
    spi: Spi,
    channel: u8,
    samples: u8,
}

impl Mcp3008Pot {
    pub fn new(channel: u8, samples: u8) -> Result<Self, HwError> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self {
            spi,
            channel: channel & 0x07,
            samples: samples.max(1),
        })
    }

    fn sample(&mut self) -> Result<u16, HwError> {
        // Single-ended conversion: start bit, SGL|channel, then clock out
        // the 10-bit result.
        let tx = [0x01, (0x08 | self.channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok((u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]))
    }
}

impl PositionSensor for Mcp3008Pot {
    fn read(&mut self) -> HwResult<u16> {
        let mut sum: u32 = 0;
        for _ in 0..self.samples {
            sum += u32::from(self.sample().map_err(boxed)?);
        }
        let avg = (sum / u32::from(self.samples)) as u16;
        trace!(raw = avg, "pot sample");
        Ok(avg)
    }
}
