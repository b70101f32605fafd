//! Vehicle platform error types

use thiserror::Error;

/// Failures of a vehicle platform call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VehicleError {
    /// No vehicle with this identifier is visible
    #[error("vehicle {vehicle_id} not found")]
    NotFound { vehicle_id: String },
    /// Missing, expired or insufficient credential
    #[error("not authorized to read vehicle data")]
    Unauthorized,
    /// The vehicle exists but has no location data
    #[error("no location data available for vehicle {vehicle_id}")]
    Unavailable { vehicle_id: String },
    /// The platform answered with a location that fails validation
    #[error("vehicle platform returned an invalid location: {0}")]
    InvalidLocation(String),
    /// Network, timeout or unexpected response
    #[error("vehicle platform request failed: {0}")]
    Transport(String),
    /// A required setting is missing
    #[error("{0} is required for the vehicle platform")]
    NotConfigured(&'static str),
}

/// Result type for vehicle platform operations
pub type VehicleResult<T> = Result<T, VehicleError>;

impl From<reqwest::Error> for VehicleError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            VehicleError::Transport("request timed out".to_string())
        } else {
            VehicleError::Transport(error.to_string())
        }
    }
}
