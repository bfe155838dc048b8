//! Geolocation capture flow for the draft form.
//!
//! One outstanding request at a time, with a fixed timeout after which the
//! request counts as failed. The status line next to the field mirrors
//! every state change; a failure never blocks the rest of the form.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::time::timeout;

use cuaderno_core::error::{CuadernoError, Result};
use cuaderno_core::geolocation::{
    Coordinates, GeolocationError, GeolocationProvider, GeolocationRequest,
};

/// Status of the geolocation field, rendered inline next to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationStatus {
    Idle,
    Searching,
    Captured(Coordinates),
    Failed(GeolocationError),
}

impl std::fmt::Display for GeolocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(
                f,
                "Haga clic en 'Obtener' para registrar la ubicación actual."
            ),
            Self::Searching => write!(f, "Buscando ubicación..."),
            Self::Captured(coords) => write!(f, "Ubicación registrada: {}", coords),
            Self::Failed(e) => write!(f, "Error de geolocalización. {}", e),
        }
    }
}

/// Drives the external position provider and publishes field status.
pub struct GeolocationService {
    provider: Arc<dyn GeolocationProvider>,
    status_tx: Arc<watch::Sender<GeolocationStatus>>,
    busy: AtomicBool,
}

impl GeolocationService {
    pub fn new(provider: Arc<dyn GeolocationProvider>) -> Self {
        let (status_tx, _) = watch::channel(GeolocationStatus::Idle);
        Self {
            provider,
            status_tx: Arc::new(status_tx),
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a request is outstanding. The trigger affordance is
    /// disabled while this is true.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> GeolocationStatus {
        *self.status_tx.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<GeolocationStatus> {
        self.status_tx.subscribe()
    }

    /// Back to the idle prompt (draft reset).
    pub fn reset(&self) {
        self.status_tx.send_replace(GeolocationStatus::Idle);
    }

    /// Acquires the current position with the default request parameters.
    ///
    /// Returns the coordinates so the caller can write them into the
    /// draft's geolocation field. There is no cancellation: the first
    /// resolution wins, and a request still pending after the timeout is
    /// treated as [`GeolocationError::Timeout`].
    pub async fn capture(&self) -> Result<Coordinates> {
        self.capture_with(GeolocationRequest::default()).await
    }

    /// Acquires the current position with explicit request parameters.
    pub async fn capture_with(&self, request: GeolocationRequest) -> Result<Coordinates> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(CuadernoError::validation(
                "Ya hay una búsqueda de ubicación en curso.",
            ));
        }
        self.status_tx.send_replace(GeolocationStatus::Searching);

        let outcome = match timeout(request.timeout, self.provider.current_position(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(GeolocationError::Timeout),
        };
        self.busy.store(false, Ordering::SeqCst);

        match outcome {
            Ok(coords) => {
                tracing::debug!(%coords, "Position captured");
                self.status_tx
                    .send_replace(GeolocationStatus::Captured(coords));
                Ok(coords)
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.status_tx.send_replace(GeolocationStatus::Failed(e));
                Err(e.into())
            }
        }
    }
}
