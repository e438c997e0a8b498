use thiserror::Error;

/// Setup failures. Every variant aborts a run before the first sample is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid track geometry: {0}")]
    InvalidTrackGeometry(String),

    #[error("invalid powertrain configuration: {0}")]
    InvalidPowertrainConfig(String),

    #[error("invalid vehicle configuration: {0}")]
    InvalidVehicleConfig(String),

    #[error("discretization step must be positive, got {0}")]
    NonPositiveStep(f64),

    #[error("failed to read configuration: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}
