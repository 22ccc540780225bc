//! Configuration for the REST backend and autosave timing.
//!
//! Configuration is read from a TOML file. When no explicit path is given the
//! file is looked up following the XDG Base Directory specification:
//! `$XDG_CONFIG_HOME/imovel/config.toml` or `~/.config/imovel/config.toml`.
//! Every key has a default, so a missing file yields [`Config::default`].

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigResultExt, Result};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub autosave: AutosaveConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Bearer credential attached to every request
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Base URL of the CEP lookup service
    pub cep_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
            timeout_secs: 30,
            cep_url: "https://viacep.com.br/ws".to_string(),
        }
    }
}

/// Debounce delays used by the step forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Delay for single-field edits
    pub field_delay_ms: u64,
    /// Delay for list-like edits (selections, videos, images)
    pub batch_delay_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            field_delay_ms: 300,
            batch_delay_ms: 500,
        }
    }
}

impl AutosaveConfig {
    pub fn field_delay(&self) -> Duration {
        Duration::from_millis(self.field_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

impl Config {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Configuration` if an explicit file cannot be read
    /// or if any file found fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .config_context(format!("Failed to read '{}'", path.display()))?;
        Self::from_toml(&text).map_err(|e| match e {
            crate::WizardError::Configuration { message } => crate::WizardError::Configuration {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).config_context("Invalid configuration")
    }

    /// Returns the existing config file at the XDG location, if any.
    fn default_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("imovel").find_config_file("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.autosave.field_delay(), Duration::from_millis(300));
        assert_eq!(config.autosave.batch_delay(), Duration::from_millis(500));
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "https://crm.example.com/api"
            token = "secret"

            [autosave]
            field_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://crm.example.com/api");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.autosave.field_delay_ms, 250);
        assert_eq!(config.autosave.batch_delay_ms, 500);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[autosave]\nbatch_delay_ms = 800").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.autosave.batch_delay_ms, 800);
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[autosave]\nfield_delay_ms = \"fast\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, crate::WizardError::Configuration { .. }));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/imovel.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
