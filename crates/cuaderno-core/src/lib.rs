//! Domain layer for Cuaderno.
//!
//! Pure models and provider traits: the draft with its two sub-logs, the
//! composed entry payload, the filter/summary view-models, and the
//! interfaces behind which identity, persistence and geolocation live.

pub mod draft;
pub mod entry;
pub mod error;
pub mod geolocation;
pub mod identity;
pub mod session;
pub mod store;
pub mod view;

// Re-export common error type
pub use error::CuadernoError;
