//! Hardware seams for the servo tuner.
//!
//! Simulated implementations are always available; real Raspberry Pi drivers
//! sit behind the `hardware` feature. The file-backed calibration store is
//! plain std and works everywhere.

pub mod error;
pub mod sim;
pub mod store;

#[cfg(feature = "hardware")]
pub mod adc;
#[cfg(feature = "hardware")]
pub mod button;
#[cfg(feature = "hardware")]
pub mod servo;
#[cfg(feature = "hardware")]
pub mod sevenseg;

pub use error::HwError;
pub use sim::{ConsoleDisplay, SimulatedActuator, SimulatedButton, SimulatedPot};
pub use store::FileStore;

#[cfg(feature = "hardware")]
pub use adc::Mcp3008Pot;
#[cfg(feature = "hardware")]
pub use button::GpioButton;
#[cfg(feature = "hardware")]
pub use servo::PwmServo;
#[cfg(feature = "hardware")]
pub use sevenseg::ShiftRegisterDisplay;
