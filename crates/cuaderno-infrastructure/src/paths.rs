//! Unified path management for cuaderno files.
//!
//! Configuration and identity live under the platform config directory;
//! entry documents live under the platform data directory.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for cuaderno.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/cuaderno/          # Config directory
/// ├── config.toml              # Application configuration
/// └── identity.txt             # Persisted anonymous user id
///
/// ~/.local/share/cuaderno/     # Data directory
/// └── users/
///     └── <user-id>/
///         └── entries/         # One JSON document per entry
/// ```
pub struct CuadernoPaths;

impl CuadernoPaths {
    /// Returns the cuaderno configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("cuaderno"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the cuaderno data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("cuaderno"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted anonymous identity file.
    pub fn identity_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("identity.txt"))
    }

    /// Returns the root of the per-user entry collections.
    pub fn users_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("users"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = CuadernoPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("cuaderno"));
    }

    #[test]
    fn test_config_file() {
        let config_file = CuadernoPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = CuadernoPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_identity_file() {
        let identity_file = CuadernoPaths::identity_file().unwrap();
        assert!(identity_file.ends_with("identity.txt"));
        let config_dir = CuadernoPaths::config_dir().unwrap();
        assert!(identity_file.starts_with(&config_dir));
    }

    #[test]
    fn test_users_dir() {
        let users_dir = CuadernoPaths::users_dir().unwrap();
        assert!(users_dir.ends_with("users"));
        let data_dir = CuadernoPaths::data_dir().unwrap();
        assert!(users_dir.starts_with(&data_dir));
    }
}
