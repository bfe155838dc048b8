//! Configuration service.
//!
//! Loads the application configuration from config.toml
//! (~/.config/cuaderno/config.toml) and caches it.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use cuaderno_core::error::{CuadernoError, Result};

use crate::paths::CuadernoPaths;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CuadernoConfig {
    /// Root directory for entry documents. Defaults to the platform data
    /// directory when absent.
    pub data_dir: Option<PathBuf>,
    /// Fixed position as "lat, lon" for the static geolocation provider.
    pub geolocation: Option<String>,
}

/// Loads and caches the configuration.
///
/// The file is read once and cached to avoid repeated I/O; a missing file
/// yields the defaults, a malformed file is a startup error rather than a
/// silent no-op.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: Arc<RwLock<Option<CuadernoConfig>>>,
}

impl ConfigService {
    /// Creates a service reading from the default location.
    pub fn new() -> Self {
        Self {
            config_path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading from an explicit path (tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<CuadernoConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| CuadernoError::internal(format!("Config lock poisoned: {}", e)))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|e| CuadernoError::internal(format!("Config lock poisoned: {}", e)))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Resolves the entry document root: configured `data_dir`, or the
    /// platform default.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.get_config()?.data_dir {
            return Ok(dir);
        }
        CuadernoPaths::users_dir()
            .map_err(|e| CuadernoError::config(format!("No se pudo resolver el directorio de datos: {}", e)))
    }

    fn load_config(&self) -> Result<CuadernoConfig> {
        let config_path = match &self.config_path {
            Some(path) => path.clone(),
            None => CuadernoPaths::config_file().map_err(|e| {
                CuadernoError::config(format!("No se pudo resolver la configuración: {}", e))
            })?,
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file; using defaults");
            return Ok(CuadernoConfig::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        toml::from_str(&content).map_err(|e| {
            CuadernoError::config(format!(
                "Configuración inválida en {}: {}",
                config_path.display(),
                e
            ))
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.get_config().unwrap();
        assert_eq!(config, CuadernoConfig::default());
    }

    #[test]
    fn test_loads_and_caches_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/cuaderno-data\"\ngeolocation = \"4.600000, -74.080000\"\n",
        )
        .unwrap();

        let service = ConfigService::with_path(path.clone());
        let config = service.get_config().unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/cuaderno-data")));
        assert_eq!(config.geolocation.as_deref(), Some("4.600000, -74.080000"));

        // A later file change is not seen until the cache is invalidated.
        std::fs::write(&path, "geolocation = \"1.0, 1.0\"\n").unwrap();
        assert_eq!(service.get_config().unwrap(), config);

        service.invalidate_cache();
        let reloaded = service.get_config().unwrap();
        assert_eq!(reloaded.data_dir, None);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = [not toml").unwrap();

        let service = ConfigService::with_path(path);
        let err = service.get_config().unwrap_err();
        assert!(matches!(err, CuadernoError::Config(_)));
    }

    #[test]
    fn test_resolve_data_dir_prefers_configured() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/tmp/elsewhere\"\n").unwrap();

        let service = ConfigService::with_path(path);
        assert_eq!(
            service.resolve_data_dir().unwrap(),
            PathBuf::from("/tmp/elsewhere")
        );
    }
}
