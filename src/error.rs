use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum MeterError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid reading {value}: must be finite and between 0 and {max_value}")]
    InvalidReading { value: f64, max_value: f64 },

    #[error("Reading {value} has more than {fraction_digits} decimal places")]
    ExcessPrecision { value: f64, fraction_digits: u32 },

    #[error("Malformed reading text '{0}'")]
    MalformedReading(String),

    #[error("Reference period from {start} to {end} has zero duration")]
    DegeneratePeriod { start: String, end: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MeterError {
    fn from(err: serde_json::Error) -> Self {
        MeterError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MeterError>;
