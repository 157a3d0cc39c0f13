use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TunerError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("calibration store error: {0}")]
    Store(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing position sensor")]
    MissingSensor,
    #[error("missing button")]
    MissingButton,
    #[error("missing actuator")]
    MissingActuator,
    #[error("missing display")]
    MissingDisplay,
    #[error("missing calibration store")]
    MissingStore,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Map a seam-level error into a typed `TunerError`.
pub(crate) fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> TunerError {
    TunerError::Hardware(e.to_string())
}
