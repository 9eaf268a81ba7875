//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::LoggerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `auth.api_key`.
pub const API_KEY_ENV: &str = "API_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Toml(e) => write!(f, "Parse error: {}", e),
            ConfigError::Json(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// On-disk configuration syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Deserialize configuration text without validating it.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LoggerConfig, ConfigError> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(ConfigError::Toml),
        ConfigFormat::Json => serde_json::from_str(content).map_err(ConfigError::Json),
    }
}

/// Replace the configured API key when an override is present and non-empty.
pub fn apply_api_key_override(config: &mut LoggerConfig, api_key: Option<String>) {
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        config.auth.api_key = key;
    }
}

/// Load and validate configuration from a TOML or JSON file.
///
/// `API_KEY` from the environment wins over the file.
pub fn load_config(path: &Path) -> Result<LoggerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content, ConfigFormat::from_path(path))?;

    apply_api_key_override(&mut config, std::env::var(API_KEY_ENV).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, PayloadPolicy};

    #[test]
    fn parses_full_toml() {
        let toml = r#"
            [listener]
            bind_address = "127.0.0.1:9000"
            path = "/getmsglog.php"

            [auth]
            api_key = "secret123"

            [storage]
            path = "/var/lib/msglog/messages.json"
            serialize_writes = true

            [payload]
            policy = "strict"

            [observability]
            log_format = "json"
        "#;

        let config = parse_config(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.listener.path, "/getmsglog.php");
        assert_eq!(config.auth.api_key, "secret123");
        assert_eq!(config.storage.path, "/var/lib/msglog/messages.json");
        assert!(config.storage.serialize_writes);
        assert_eq!(config.payload.policy, PayloadPolicy::Strict);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        // untouched sections keep their defaults
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn legacy_json_config_with_php_section() {
        let json = r#"{
            "serial": { "port": ["/dev/ttyUSB0", "/dev/ttyACM0"] },
            "log": { "enabled": true, "api_url": "https://example.org/getmsglog.php", "api_key": "client-side" },
            "php": { "api_key": "secret123" }
        }"#;

        let config = parse_config(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.auth.api_key, "secret123");
        assert_eq!(config.storage.path, "messages.json");
        assert_eq!(config.payload.policy, PayloadPolicy::Compat);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("CONFIG.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Toml);
    }

    #[test]
    fn override_replaces_key() {
        let mut config = LoggerConfig::default();
        config.auth.api_key = "from-file".to_string();

        apply_api_key_override(&mut config, None);
        assert_eq!(config.auth.api_key, "from-file");

        apply_api_key_override(&mut config, Some(String::new()));
        assert_eq!(config.auth.api_key, "from-file");

        apply_api_key_override(&mut config, Some("from-env".to_string()));
        assert_eq!(config.auth.api_key, "from-env");
    }

    #[test]
    fn load_config_rejects_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[listener]\nbind_address = \"127.0.0.1:0\"\n").unwrap();

        // Only meaningful when the environment does not supply a key.
        if std::env::var(API_KEY_ENV).is_ok() {
            return;
        }
        match load_config(&path) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors[0].field, "auth.api_key");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }
}
