//! Configuration Loader
//!
//! Reads the INI file through the `config` crate, deserializes it into
//! [`ExporterConfig`] and validates it before anything else starts.
//!
//! Values are taken verbatim: backslashes and quotes are part of the value,
//! so `C:\exports\projects.yaml` and passwords containing `\` or `"` survive.

use super::error::{ConfigResult, ConfigurationError};
use super::ExporterConfig;
use config::{Config, File, FileStoredFormat, Format, Map, Value, ValueKind};
use ini::{Ini, ParseOption};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Loaded and validated configuration together with its origin
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ExporterConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load configuration from an INI file
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<ConfigManager> {
        let path = path.as_ref();
        Self::check_config_file(path)?;

        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::parse_error(path.display().to_string(), e))?;

        let raw = Config::builder()
            .add_source(File::from_str(&text, VerbatimIni))
            .build()
            .map_err(|e| ConfigurationError::parse_error(path.display().to_string(), e))?;

        let config: ExporterConfig = raw
            .try_deserialize()
            .map_err(|e| ConfigurationError::parse_error(path.display().to_string(), e))?;

        config.validate()?;

        let manager = ConfigManager {
            config,
            config_path: path.to_path_buf(),
        };

        debug!(
            "Configuration loaded successfully: {}",
            serde_json::to_string(&manager.debug_config())
                .unwrap_or_else(|_| "[serialization error]".to_string())
        );

        Ok(manager)
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Path the configuration was read from
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get sanitized configuration for debugging/logging that masks sensitive fields
    pub fn debug_config(&self) -> serde_json::Value {
        Self::sanitize_config_for_logging(&self.config)
    }

    fn check_config_file(path: &Path) -> ConfigResult<()> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigurationError::config_file_not_found(path));
            }
            Err(e) => {
                return Err(ConfigurationError::parse_error(
                    path.display().to_string(),
                    e,
                ))
            }
        };

        if !metadata.is_file() {
            return Err(ConfigurationError::invalid_value(
                "config_path",
                path.display().to_string(),
                "configuration path must point to a regular file",
            ));
        }

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::invalid_value(
                "file_size",
                metadata.len().to_string(),
                format!("configuration file larger than {MAX_CONFIG_FILE_SIZE} bytes"),
            ));
        }

        Ok(())
    }

    fn sanitize_config_for_logging(config: &ExporterConfig) -> serde_json::Value {
        let mut config_json = serde_json::json!(config);
        let sensitive_patterns = ["password", "secret", "key", "token", "credential"];
        Self::sanitize_json_recursive(&mut config_json, &sensitive_patterns);
        config_json
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let is_sensitive = sensitive_patterns
                        .iter()
                        .any(|pattern| key_lower.contains(pattern));

                    if !is_sensitive {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                        continue;
                    }

                    *val = match val {
                        serde_json::Value::String(s) if s.is_empty() => {
                            serde_json::Value::String("[EMPTY]".to_string())
                        }
                        _ => serde_json::Value::String("[MASKED]".to_string()),
                    };
                }
            }
            serde_json::Value::Array(arr) => {
                for item in arr.iter_mut() {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }
}

/// INI format with quote and escape processing turned off
#[derive(Debug, Clone, Copy)]
pub struct VerbatimIni;

impl VerbatimIni {
    const OPTIONS: ParseOption = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
    };
}

impl Format for VerbatimIni {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let ini = Ini::load_from_str_opt(text, Self::OPTIONS)?;

        let mut root: Map<String, Value> = Map::new();
        for (section, properties) in ini.iter() {
            let entries = properties
                .iter()
                .map(|(k, v)| (k.to_owned(), Value::new(uri, ValueKind::String(v.to_owned()))));
            match section {
                Some(section) => {
                    let table: Map<String, Value> = entries.collect();
                    root.insert(
                        section.to_owned(),
                        Value::new(uri, ValueKind::Table(table)),
                    );
                }
                None => root.extend(entries),
            }
        }
        Ok(root)
    }
}

impl FileStoredFormat for VerbatimIni {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["ini"]
    }
}
