pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Error type used at every hardware seam.
pub type HwResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Size in bytes of the persisted calibration record:
/// three u16 minimum pulses followed by three u16 maximum pulses,
/// little-endian.
pub const RECORD_LEN: usize = 12;

/// Averaged analog position input (potentiometer or equivalent).
pub trait PositionSensor {
    /// One stable reading in `0..=full_scale` raw units.
    fn read(&mut self) -> HwResult<u16>;
}

/// Momentary push button. `true` means pressed, regardless of wiring polarity.
pub trait Button {
    fn is_pressed(&mut self) -> HwResult<bool>;
}

/// PWM-positioned actuator addressed by pulse width in microseconds.
pub trait Actuator {
    /// Enable output and set the clamp bounds for subsequent commands.
    fn attach(&mut self, min_pulse_us: u16, max_pulse_us: u16) -> HwResult<()>;
    /// Disable output. Commanding a detached actuator is an error.
    fn detach(&mut self) -> HwResult<()>;
    /// Command a pulse width; implementations clamp into the attach bounds.
    fn command_pulse(&mut self, pulse_us: u16) -> HwResult<()>;
    /// Last commanded pulse width after clamping.
    fn current_pulse(&self) -> u16;
}

/// One character position of the 3-digit segmented display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// 0..=9
    Digit(u8),
    Blank,
    UpperC,
    Dash,
}

/// Three-digit segmented display, leftmost glyph first.
pub trait Display {
    fn show(&mut self, frame: [Glyph; 3]) -> HwResult<()>;
}

/// Non-volatile storage for the fixed-size calibration record.
pub trait CalibrationStore {
    fn read_record(&mut self) -> HwResult<[u8; RECORD_LEN]>;
    fn write_record(&mut self, record: &[u8; RECORD_LEN]) -> HwResult<()>;
}

impl<T: PositionSensor + ?Sized> PositionSensor for Box<T> {
    fn read(&mut self) -> HwResult<u16> {
        (**self).read()
    }
}

impl<T: Button + ?Sized> Button for Box<T> {
    fn is_pressed(&mut self) -> HwResult<bool> {
        (**self).is_pressed()
    }
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn attach(&mut self, min_pulse_us: u16, max_pulse_us: u16) -> HwResult<()> {
        (**self).attach(min_pulse_us, max_pulse_us)
    }
    fn detach(&mut self) -> HwResult<()> {
        (**self).detach()
    }
    fn command_pulse(&mut self, pulse_us: u16) -> HwResult<()> {
        (**self).command_pulse(pulse_us)
    }
    fn current_pulse(&self) -> u16 {
        (**self).current_pulse()
    }
}

impl<T: Display + ?Sized> Display for Box<T> {
    fn show(&mut self, frame: [Glyph; 3]) -> HwResult<()> {
        (**self).show(frame)
    }
}

impl<T: CalibrationStore + ?Sized> CalibrationStore for Box<T> {
    fn read_record(&mut self) -> HwResult<[u8; RECORD_LEN]> {
        (**self).read_record()
    }
    fn write_record(&mut self, record: &[u8; RECORD_LEN]) -> HwResult<()> {
        (**self).write_record(record)
    }
}
