use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("pwm error: {0}")]
    Pwm(String),
    #[error("spi error: {0}")]
    Spi(String),
    #[error("actuator commanded while detached")]
    Detached,
    #[error("calibration record truncated: {0} bytes")]
    ShortRecord(usize),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;

/// Box an `HwError` for the trait seams.
#[cfg(feature = "hardware")]
pub(crate) fn boxed(e: HwError) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}
