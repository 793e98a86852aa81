//! Error types for the dispersion engine
//!
//! Only malformed input is an error. Physically expected zero results
//! (calm wind, rain, upwind targets) come back as a valid
//! [`ConcentrationResult`](crate::ConcentrationResult) instead.

use thiserror::Error;

/// Error type for rejected inputs and parameter sets.
#[derive(Error, Debug)]
pub enum DispersionError {
    /// A mandatory field is absent or NaN.
    #[error("Missing input: {field}")]
    MissingInput { field: &'static str },

    /// A coordinate is outside the valid latitude/longitude range.
    #[error("Invalid coordinate {field}={value}")]
    InvalidCoordinate { field: &'static str, value: f64 },

    /// Wind speed is negative or not finite. Calm wind is not an error.
    #[error("Invalid wind speed {0} m/s: must be finite and non-negative")]
    InvalidWindSpeed(f64),

    /// An observation hour is not a clock hour.
    #[error("Invalid hour {0}: must be within 0..=23")]
    InvalidHour(u32),

    /// An empirical parameter table failed validation.
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    /// The parameter file could not be read.
    #[error("Failed to read parameter file: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// The parameter file is not valid TOML for [`ModelParameters`](crate::ModelParameters).
    #[error("Failed to parse parameter file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, DispersionError>`.
pub type DispersionResult<T> = Result<T, DispersionError>;

impl DispersionError {
    /// Reject NaN and infinities for a required numeric field.
    pub(crate) fn require_finite(field: &'static str, value: f64) -> DispersionResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DispersionError::MissingInput { field })
        }
    }
}
