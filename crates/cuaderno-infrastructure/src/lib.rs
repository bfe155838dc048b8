pub mod anonymous_identity;
pub mod config_service;
pub mod json_dir_entry_store;
pub mod paths;
pub mod static_geolocation;
pub mod storage;

pub use crate::anonymous_identity::AnonymousIdentityProvider;
pub use crate::config_service::{ConfigService, CuadernoConfig};
pub use crate::json_dir_entry_store::JsonDirEntryStore;
pub use crate::paths::CuadernoPaths;
pub use crate::static_geolocation::StaticGeolocationProvider;
