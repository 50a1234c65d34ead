//! Loads `config.toml` and `secret.json`.

use ryan_core::config::{AppConfig, SecretConfig};
use ryan_core::error::{Result, RyanError};
use std::path::{Path, PathBuf};

/// Reads the application configuration files.
///
/// A missing file yields defaults; a file that exists but does not parse is
/// a `RyanError::Config`.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
    secret_path: PathBuf,
}

impl ConfigService {
    pub fn new(config_path: impl Into<PathBuf>, secret_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            secret_path: secret_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        let Some(raw) = read_optional(&self.config_path)? else {
            tracing::debug!("No config at {}; using defaults", self.config_path.display());
            return Ok(AppConfig::default());
        };
        toml::from_str(&raw).map_err(|e| {
            RyanError::config(format!("{}: {}", self.config_path.display(), e))
        })
    }

    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let Some(raw) = read_optional(&self.secret_path)? else {
            return Ok(SecretConfig::default());
        };
        if raw.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        serde_json::from_str(&raw).map_err(|e| {
            RyanError::config(format!("{}: {}", self.secret_path.display(), e))
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RyanError::config(format!("{}: {}", path.display(), e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ryan_core::config::CompletionBackend;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(dir.path().join("config.toml"), dir.path().join("secret.json"))
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        assert_eq!(service.load_config().unwrap(), AppConfig::default());
        assert_eq!(service.load_secrets().unwrap(), SecretConfig::default());
    }

    #[test]
    fn test_config_and_secret_are_parsed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[completion]\nbackend = \"anthropic\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("secret.json"),
            r#"{"claude": {"api_key": "sk-test"}}"#,
        )
        .unwrap();

        let service = service(&dir);
        assert_eq!(
            service.load_config().unwrap().completion.backend,
            CompletionBackend::Anthropic
        );
        assert_eq!(
            service.load_secrets().unwrap().claude.map(|c| c.api_key),
            Some("sk-test".to_string())
        );
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[completion\n").unwrap();

        let err = service(&dir).load_config().unwrap_err();
        assert!(matches!(err, RyanError::Config(_)));
    }
}
