//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check upstream URLs are present and parseable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::AppConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "upstream.point_api_url").
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the full configuration, collecting every violation.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".into(),
            message: format!("not a valid socket address: {:?}", config.listener.bind_address),
        });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "listener.request_timeout_secs".into(),
            message: "must be greater than zero".into(),
        });
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError {
            field: "listener.max_body_bytes".into(),
            message: "must be greater than zero".into(),
        });
    }

    check_url(&mut errors, "upstream.point_api_url", &config.upstream.point_api_url);
    check_url(&mut errors, "upstream.thing_api_url", &config.upstream.thing_api_url);
    if config.upstream.thing_api_version.is_empty() {
        errors.push(ValidationError {
            field: "upstream.thing_api_version".into(),
            message: "must not be empty".into(),
        });
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "upstream.timeout_secs".into(),
            message: "must be greater than zero".into(),
        });
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second == 0 {
            errors.push(ValidationError {
                field: "rate_limit.requests_per_second".into(),
                message: "must be greater than zero when rate limiting is enabled".into(),
            });
        }
        if config.rate_limit.burst == 0 {
            errors.push(ValidationError {
                field: "rate_limit.burst".into(),
                message: "must be greater than zero when rate limiting is enabled".into(),
            });
        }
    }

    if config.security.csrf_enabled && config.security.secret_key.is_empty() {
        errors.push(ValidationError {
            field: "security.secret_key".into(),
            message: "must be set when CSRF protection is enabled".into(),
        });
    }

    if config.map.container_id.is_empty() {
        errors.push(ValidationError {
            field: "map.container_id".into(),
            message: "must not be empty".into(),
        });
    }
    if config.map.tile_url.is_empty() {
        errors.push(ValidationError {
            field: "map.tile_url".into(),
            message: "must not be empty".into(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError {
            field: field.into(),
            message: "must be set".into(),
        });
    } else if url::Url::parse(value).is_err() {
        errors.push(ValidationError {
            field: field.into(),
            message: format!("not a valid URL: {:?}", value),
        });
    }
}
