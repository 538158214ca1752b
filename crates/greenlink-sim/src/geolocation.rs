//! Geolocation collaborator.
//!
//! The position is queried but never used to compute anything: callers
//! only care whether the query succeeded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// HITEC City, Hyderabad.
pub const HYDERABAD: Coordinates = Coordinates {
    latitude: 17.4435,
    longitude: 78.3772,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("Geolocation is not supported by your browser.")]
    Unsupported,

    #[error("Unable to retrieve location.")]
    Unavailable,
}

/// Source of the operator's current position.
pub trait LocationProvider: Send + Sync {
    fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Always fails with the given error.
#[derive(Debug, Clone, Copy)]
pub struct NoLocation(pub LocationError);

impl LocationProvider for NoLocation {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(self.0)
    }
}
