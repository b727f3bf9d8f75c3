//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the map frontend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Upstream API settings.
    pub upstream: UpstreamConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Security settings (cookies, CSRF, response headers).
    pub security: SecurityConfig,

    /// Map page settings (tile layer, container).
    pub map: MapConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Request timeout in seconds applied to every route.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream API configuration.
///
/// The service fronts two HTTP APIs: the point API (serves
/// `application/geo+json` features, unauthenticated) and the thing API
/// (JSON, versioned base path, bearer-token auth; also owns users and the
/// token endpoint).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the point API (e.g., "http://localhost:9091").
    pub point_api_url: String,

    /// Base URL of the thing API (e.g., "http://localhost:9092").
    pub thing_api_url: String,

    /// Version segment of the thing API path (e.g., "v1").
    pub thing_api_version: String,

    /// Timeout for upstream calls in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            point_api_url: String::new(),
            thing_api_url: String::new(),
            thing_api_version: "v1".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable per-client rate limiting.
    pub enabled: bool,

    /// Sustained requests per second per client.
    pub requests_per_second: u32,

    /// Burst capacity per client.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // The original deployment allowed 2/second sustained, 60/minute peak.
        Self {
            enabled: true,
            requests_per_second: 2,
            burst: 60,
        }
    }
}

/// Security configuration: cookie handling and response headers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Secret key for signing cookies (flash, CSRF).
    pub secret_key: String,

    /// Mark cookies Secure and emit Strict-Transport-Security.
    pub cookie_secure: bool,

    /// Enable CSRF protection on form submissions.
    pub csrf_enabled: bool,

    /// Content-Security-Policy directives.
    pub csp: CspConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            cookie_secure: true,
            csrf_enabled: true,
            csp: CspConfig::default(),
        }
    }
}

/// Content-Security-Policy sources per directive.
///
/// Script sources are extended at runtime with a per-response nonce for the
/// inline map initializer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CspConfig {
    pub default_src: Vec<String>,
    pub style_src: Vec<String>,
    pub script_src: Vec<String>,
    pub img_src: Vec<String>,
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            default_src: vec!["'self'".into()],
            style_src: vec!["'self'".into(), "https://unpkg.com".into()],
            script_src: vec!["'self'".into(), "https://unpkg.com".into()],
            // Raster tiles are fetched straight from the OSM subdomains.
            img_src: vec![
                "'self'".into(),
                "data:".into(),
                "https://*.tile.openstreetmap.org".into(),
            ],
        }
    }
}

/// Map page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    /// DOM id of the map container element.
    pub container_id: String,

    /// Tile URL template with {s}/{z}/{x}/{y} placeholders.
    pub tile_url: String,

    /// Maximum zoom bound for the tile layer.
    pub max_zoom: u8,

    /// Attribution string shown on the map (may contain markup).
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "mapid".to_string(),
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            max_zoom: 19,
            attribution:
                "&copy; <a href=\"https://openstreetmap.org/copyright\">OpenStreetMap contributors</a>"
                    .to_string(),
        }
    }
}
