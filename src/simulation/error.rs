//! Error types and handling
//!
//! This module contains the error type returned by simulation runs.

use thiserror::Error;
use tracing::{error, warn};

use crate::data::MatrixShapeError;
use crate::fitting::FitError;
use crate::types::{ConfigError, ConfigValidationError};

/// Errors that can occur during a simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Design, coefficients or supplied covariates are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigValidationError),

    /// Configuration could not be loaded
    #[error("Configuration loading failed: {0}")]
    ConfigLoad(#[from] ConfigError),

    /// Covariate tables do not line up with each other
    #[error("Shape mismatch: {0}")]
    Shape(#[from] MatrixShapeError),

    /// The random source rejected a draw
    #[error("Sampling error: {0}")]
    SamplingError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Failure reported by a fitting routine, passed through unchanged
    #[error(transparent)]
    Fitting(#[from] FitError),
}

impl SimulationError {
    /// Create a sampling error
    pub fn sampling_error(msg: impl Into<String>) -> Self {
        Self::SamplingError(msg.into())
    }

    /// Check if retrying the same operation could succeed
    ///
    /// Generation is a pure function of its inputs, so only I/O failures qualify.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimulationError::IoError(_))
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::InvalidConfiguration(_) => "Configuration",
            SimulationError::ConfigLoad(_) => "Configuration",
            SimulationError::Shape(_) => "Configuration",
            SimulationError::SamplingError(_) => "Sampling",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
            SimulationError::Fitting(_) => "Fitting",
        }
    }

    /// Log this error at a level matching its category
    pub fn log(&self) {
        match self {
            SimulationError::Fitting(_) => warn!("Error in {}: {}", self.category(), self),
            _ => error!("Error in {}: {}", self.category(), self),
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
