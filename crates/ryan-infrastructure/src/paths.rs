//! Path management for Ryan configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/ryan/              # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/ryan/         # Data directory
//! └── projects/                # Project documents (ryan_projects.json)
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "ryan";

#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves Ryan's files, optionally under an explicit base directory.
///
/// With a base, config and data share that directory (useful for tests
/// and `--data-dir`).
#[derive(Debug, Clone, Default)]
pub struct RyanPaths {
    base: Option<PathBuf>,
}

impl RyanPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Path to `secret.json`. Keep it at mode 600.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn projects_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("projects"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_overrides_platform_dirs() {
        let paths = RyanPaths::new(Some(Path::new("/tmp/ryan-test")));
        assert_eq!(paths.config_file().unwrap(), Path::new("/tmp/ryan-test/config.toml"));
        assert_eq!(paths.secret_file().unwrap(), Path::new("/tmp/ryan-test/secret.json"));
        assert_eq!(paths.projects_dir().unwrap(), Path::new("/tmp/ryan-test/projects"));
    }

    #[test]
    fn test_platform_dirs_end_with_app_name() {
        let paths = RyanPaths::default();
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with(APP_DIR));
            assert!(paths.config_file().unwrap().starts_with(&config_dir));
        }
        if let Ok(data_dir) = paths.data_dir() {
            assert!(paths.projects_dir().unwrap().starts_with(&data_dir));
        }
    }
}
