//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
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

/// Load configuration: optional TOML file, then environment overrides,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment variable overrides.
///
/// The variable names match the ones the service has always been deployed
/// with, so existing environments keep working without a config file.
fn apply_env(config: &mut AppConfig) {
    if let Ok(url) = std::env::var("POINT_API_URL") {
        config.upstream.point_api_url = url;
    }
    if let Ok(url) = std::env::var("THING_API_URL") {
        config.upstream.thing_api_url = url;
    }
    if let Ok(version) = std::env::var("THING_API_VERSION") {
        config.upstream.thing_api_version = version;
    }
    if let Ok(timeout) = std::env::var("TIMEOUT") {
        if let Ok(secs) = timeout.parse() {
            config.upstream.timeout_secs = secs;
        }
    }
    if let Ok(key) = std::env::var("SECRET_KEY") {
        config.security.secret_key = key;
    }
    if let Ok(addr) = std::env::var("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fail_validation_without_upstreams() {
        // No file, no env: upstream URLs are empty and must be rejected.
        let config = AppConfig::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            [upstream]
            point_api_url = "http://localhost:9091"
            thing_api_url = "http://localhost:9092"

            [security]
            secret_key = "not-a-real-secret"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.upstream.point_api_url, "http://localhost:9091");
        assert_eq!(config.upstream.thing_api_version, "v1");
        assert_eq!(config.map.max_zoom, 19);
        assert!(validate_config(&config).is_ok());
    }
}
