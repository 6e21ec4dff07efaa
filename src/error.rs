//! Error taxonomy for sequencing requests.
//!
//! Validation failures (precedence, time windows) are not errors; they are
//! reported as [`crate::validator::ValidationOutcome`] values.

use thiserror::Error;

use crate::stop::{PairingKey, StopId, StopRole};

/// Errors raised by optimization, estimation and validation entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequencingError {
    /// The request itself is malformed.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable description of the problem.
        reason: String,
    },

    /// Latitude or longitude outside the valid range, or not finite.
    #[error("coordinate ({lat}, {lon}) is out of range")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Average speed was zero, negative or not finite.
    #[error("average speed must be positive, got {speed_kmh} km/h")]
    InvalidSpeed { speed_kmh: f64 },

    /// Service duration was negative or not finite.
    #[error("stop {stop} has invalid service duration {minutes} minutes")]
    InvalidServiceDuration { stop: StopId, minutes: f64 },

    /// More than one pickup or more than one delivery share a pairing key.
    #[error("pairing key {key} has {count} stops with role {role:?}")]
    MalformedPairing {
        key: PairingKey,
        role: StopRole,
        count: usize,
    },

    /// A distance matrix provider returned a matrix of the wrong shape.
    #[error("distance matrix has shape {actual}, expected {expected}x{expected}")]
    MatrixShape { expected: usize, actual: String },
}

impl SequencingError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        SequencingError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True when the caller sent bad data, false when the system itself is
    /// misconfigured.
    pub fn is_client_error(&self) -> bool {
        match self {
            SequencingError::InvalidInput { .. }
            | SequencingError::InvalidCoordinate { .. }
            | SequencingError::InvalidServiceDuration { .. }
            | SequencingError::MalformedPairing { .. } => true,
            SequencingError::InvalidSpeed { .. } | SequencingError::MatrixShape { .. } => false,
        }
    }
}
