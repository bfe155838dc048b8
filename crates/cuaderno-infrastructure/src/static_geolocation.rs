//! Config-driven geolocation provider.
//!
//! A terminal has no positioning hardware; the position comes from the
//! configuration file instead. Without one, every request fails as
//! unavailable, exercising the same inline error path a device denial
//! would.

use async_trait::async_trait;

use cuaderno_core::geolocation::{
    Coordinates, GeolocationError, GeolocationProvider, GeolocationRequest,
};

use crate::config_service::CuadernoConfig;

/// Geolocation provider resolving to a fixed configured position.
pub struct StaticGeolocationProvider {
    position: Option<Coordinates>,
}

impl StaticGeolocationProvider {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }

    /// Builds the provider from the `geolocation = "lat, lon"` config key.
    /// An unparsable value is treated as absent.
    pub fn from_config(config: &CuadernoConfig) -> Self {
        let position = config.geolocation.as_deref().and_then(|field| {
            let parsed = Coordinates::parse_field(field);
            if parsed.is_none() {
                tracing::warn!(field = %field, "Ignoring unparsable geolocation config");
            }
            parsed
        });
        Self::new(position)
    }
}

#[async_trait]
impl GeolocationProvider for StaticGeolocationProvider {
    async fn current_position(
        &self,
        _request: GeolocationRequest,
    ) -> Result<Coordinates, GeolocationError> {
        self.position.ok_or(GeolocationError::PositionUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_position_is_returned() {
        let config = CuadernoConfig {
            geolocation: Some("4.600000, -74.080000".to_string()),
            ..Default::default()
        };
        let provider = StaticGeolocationProvider::from_config(&config);

        let coords = provider
            .current_position(GeolocationRequest::default())
            .await
            .unwrap();
        assert_eq!(coords.to_field(), "4.600000, -74.080000");
    }

    #[tokio::test]
    async fn test_missing_position_is_unavailable() {
        let provider = StaticGeolocationProvider::from_config(&CuadernoConfig::default());

        let err = provider
            .current_position(GeolocationRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PositionUnavailable);
    }

    #[tokio::test]
    async fn test_unparsable_config_is_treated_as_absent() {
        let config = CuadernoConfig {
            geolocation: Some("no son coordenadas".to_string()),
            ..Default::default()
        };
        let provider = StaticGeolocationProvider::from_config(&config);

        let err = provider
            .current_position(GeolocationRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PositionUnavailable);
    }
}
