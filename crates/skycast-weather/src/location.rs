//! System location seam.
//!
//! The orchestrator asks a [`LocationSource`] for coordinates instead of
//! talking to a platform service directly, so location-driven flows stay
//! testable. The default [`SystemLocation`] reads coordinates from the
//! `SKYCAST_LAT`/`SKYCAST_LON` environment variables; on machines without
//! them the capability reports itself unavailable.

use crate::types::{Coordinates, LocationError};

const LAT_VAR: &str = "SKYCAST_LAT";
const LON_VAR: &str = "SKYCAST_LON";

pub trait LocationSource {
    /// Whether the location capability exists at all. When false the caller
    /// must notify the user immediately without attempting a position fix.
    fn is_available(&self) -> bool;

    /// Single-shot position request; no continuous tracking.
    fn current_position(
        &self,
    ) -> impl std::future::Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Environment-backed location source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocation;

impl LocationSource for SystemLocation {
    fn is_available(&self) -> bool {
        std::env::var_os(LAT_VAR).is_some() && std::env::var_os(LON_VAR).is_some()
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let lat = read_coordinate(LAT_VAR)?;
        let lon = read_coordinate(LON_VAR)?;
        Ok(Coordinates { lat, lon })
    }
}

fn read_coordinate(var: &str) -> Result<f64, LocationError> {
    let value = std::env::var(var).map_err(|_| LocationError::ServiceUnavailable)?;
    value
        .trim()
        .parse()
        .map_err(|_| LocationError::Other(format!("{var} is not a valid coordinate")))
}
