use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Zenoh session configuration derived from a device connection string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZenohConfig {
    /// Zenoh mode: "client" or "peer".
    pub mode: String,

    /// Endpoints to connect to.
    pub connect: Vec<String>,
}

impl Default for ZenohConfig {
    fn default() -> Self {
        Self {
            mode: "client".to_string(),
            connect: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Tracing output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default)]
        logging: LoggingConfig,
    }

    #[test]
    fn test_parse_logging() {
        let json5 = r#"
        {
            logging: {
                level: "debug",
            },
        }
        "#;

        let config: Wrapper = parse_config(json5).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_defaults() {
        let config: Wrapper = parse_config("{}").unwrap();
        assert_eq!(config.logging.level, "info");

        let zenoh = ZenohConfig::default();
        assert_eq!(zenoh.mode, "client");
        assert!(zenoh.connect.is_empty());
    }

    #[test]
    fn test_json_logging_format() {
        let config: Wrapper = parse_config(r#"{ logging: { format: "json" } }"#).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let result: Result<Wrapper> = parse_config("{ logging: ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result: Result<Wrapper> = load_config("/nonexistent/devsim.json5");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }
}
