//! Configuration for `reloader.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                           |
//! |------------|---------------------------------------------------|
//! | `[client]` | Default endpoint, script flavour, output file     |
//! | `[signal]` | Reconnect delay written into emitted frames       |
//!
//! Every field is optional; a missing file yields the defaults.

mod error;
mod util;

pub use error::ConfigError;
use util::{find_config_file, relative_to_config};

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    generator::{ClientError, Endpoint},
    log,
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "reloader.toml";

const DEFAULT_RETRY_MS: u32 = 10;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing reloader.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReloaderConfig {
    /// Path the configuration was loaded from, if any
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub signal: SignalConfig,
}

/// `[client]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Raw value so that a non-string surfaces as an argument type error.
    pub url: Option<toml::Value>,
    pub minify: bool,
    pub output: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: None,
            minify: true,
            output: None,
        }
    }
}

/// `[signal]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Reconnect delay in milliseconds; `0` leaves the field out.
    pub retry: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            retry: DEFAULT_RETRY_MS,
        }
    }
}

impl SignalConfig {
    pub const fn retry(&self) -> Option<u32> {
        match self.retry {
            0 => None,
            ms => Some(ms),
        }
    }
}

impl ReloaderConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the nearest `reloader.toml`
    /// above `cwd` is used, falling back to defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    cwd.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::Io(
                        path,
                        std::io::Error::from(std::io::ErrorKind::NotFound),
                    ));
                }
                path
            }
            None => match find_config_file(cwd, Path::new(CONFIG_FILE)) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let mut config = Self::from_path(&path)?;
        config.config_path = Some(path);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .client
            .output
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "[client] output must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured default endpoint, if any.
    ///
    /// Strings pass through unchecked; the generator validates them.
    pub fn endpoint(&self) -> Option<Result<Endpoint, ClientError>> {
        self.client.url.as_ref().map(|value| match value {
            toml::Value::String(s) => Ok(Endpoint::Str(s.clone())),
            other => Err(ClientError::InvalidArgType(format!(
                "{} ({})",
                other,
                other.type_str()
            ))),
        })
    }

    /// Output file, resolved against the config file's directory.
    pub fn output_path(&self) -> Option<PathBuf> {
        let output = self.client.output.as_deref()?;
        Some(match &self.config_path {
            Some(config_path) => relative_to_config(config_path, output),
            None => output.to_path_buf(),
        })
    }
}

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ReloaderConfig {
    let (parsed, ignored) = ReloaderConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = ReloaderConfig::from_str("[client\nurl = \"/sse\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_defaults() {
        let config = ReloaderConfig::default();
        assert!(config.config_path.is_none());
        assert!(config.client.url.is_none());
        assert!(config.client.minify);
        assert_eq!(config.signal.retry(), Some(10));
        assert!(config.endpoint().is_none());
        assert!(config.output_path().is_none());
    }

    #[test]
    fn test_parse_sections() {
        let config = test_parse_config(
            "[client]\nurl = \"/sse\"\nminify = false\noutput = \"out/reloader.js\"\n\n[signal]\nretry = 0\n",
        );
        assert!(!config.client.minify);
        assert_eq!(config.signal.retry(), None);
        assert_eq!(
            config.endpoint().unwrap().unwrap(),
            Endpoint::Str("/sse".to_string())
        );
        assert_eq!(config.output_path(), Some(PathBuf::from("out/reloader.js")));
    }

    #[test]
    fn test_non_string_url_is_type_error() {
        let config = test_parse_config("[client]\nurl = 42\n");
        let err = config.endpoint().unwrap().unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_ARG_TYPE");
        assert_eq!(
            err.to_string(),
            "Expected a URL of the resource serving Server-sent events (<string|URL>), but got 42 (integer)."
        );
    }

    #[test]
    fn test_empty_output_rejected() {
        let result = ReloaderConfig::from_str("[client]\noutput = \"\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[client]\nurl = \"/sse\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ReloaderConfig::parse_with_ignored(content).unwrap();

        assert!(config.client.url.is_some());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_load_searches_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("assets/css");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[client]\noutput = \"public/reloader.js\"\n",
        )
        .unwrap();

        let config = ReloaderConfig::load(None, &nested).unwrap();
        assert_eq!(config.config_path, Some(dir.path().join(CONFIG_FILE)));
        assert_eq!(
            config.output_path(),
            Some(dir.path().join("public/reloader.js"))
        );
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReloaderConfig::load(None, dir.path()).unwrap();
        assert!(config.config_path.is_none());
        assert!(config.client.minify);
    }

    #[test]
    fn test_load_explicit_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReloaderConfig::load(Some(Path::new("custom.toml")), dir.path());
        assert!(matches!(result, Err(ConfigError::Io(path, _)) if path.ends_with("custom.toml")));
    }

    #[test]
    fn test_load_explicit_relative() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("custom.toml"), "[signal]\nretry = 250\n").unwrap();

        let config = ReloaderConfig::load(Some(Path::new("custom.toml")), dir.path()).unwrap();
        assert_eq!(config.signal.retry(), Some(250));
    }
}
