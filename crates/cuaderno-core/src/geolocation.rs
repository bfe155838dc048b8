//! Geolocation capability consumed by the draft form.
//!
//! Acquisition itself is an external concern; the core only needs a
//! coordinate pair or a typed failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default acquisition timeout, after which the request is treated as a
/// failure.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A captured coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Formats the pair the way the geolocation form field stores it:
    /// six decimals, comma-separated.
    pub fn to_field(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lon)
    }

    /// Parses a `"lat, lon"` field value.
    pub fn parse_field(field: &str) -> Option<Self> {
        let (lat, lon) = field.split_once(',')?;
        Some(Self {
            lat: lat.trim().parse().ok()?,
            lon: lon.trim().parse().ok()?,
        })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_field())
    }
}

/// Why a geolocation request failed.
///
/// Surfaced inline near the affected field; never blocks the rest of the
/// form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeolocationError {
    #[error("Permiso denegado.")]
    PermissionDenied,
    #[error("Posición no disponible.")]
    PositionUnavailable,
    #[error("Tiempo de espera agotado.")]
    Timeout,
}

/// Parameters for a single acquisition request.
#[derive(Debug, Clone, Copy)]
pub struct GeolocationRequest {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for GeolocationRequest {
    fn default() -> Self {
        Self {
            timeout: GEOLOCATION_TIMEOUT,
            high_accuracy: true,
        }
    }
}

/// An abstract provider of the device position.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Resolves the current position, or fails with a typed
    /// [`GeolocationError`].
    async fn current_position(
        &self,
        request: GeolocationRequest,
    ) -> Result<Coordinates, GeolocationError>;
}
