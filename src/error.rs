//! Recoverable configuration errors
//!
//! Contract violations inside the simulation (bad cell indices, registry
//! bookkeeping mismatches) panic instead; only loading and validating
//! settings can fail at runtime.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} range is inverted (min {min} > max {max})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("{field} must be a fraction in [0, 1], got {value}")]
    InvalidFraction { field: &'static str, value: f64 },

    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
}

impl ConfigError {
    /// Check that `min <= max` for a named range
    pub fn check_range<T>(field: &'static str, min: T, max: T) -> Result<(), ConfigError>
    where
        T: PartialOrd + Into<f64> + Copy,
    {
        if min > max {
            return Err(ConfigError::InvertedRange {
                field,
                min: min.into(),
                max: max.into(),
            });
        }
        Ok(())
    }

    /// Check that a chance lies in [0, 1]
    pub fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidProbability { field, value });
        }
        Ok(())
    }
}
