//! Security response headers.
//!
//! # Responsibilities
//! - Emit Content-Security-Policy built from configured sources
//! - Mint a per-response script nonce for the inline map initializer
//! - Add the standard hardening headers to every response
//!
//! # Design Decisions
//! - The nonce travels via request extensions so page templates can use it
//! - Strict-Transport-Security only when cookies are marked Secure
//! - Headers are set unconditionally, error pages included

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::schema::{CspConfig, SecurityConfig};

/// Per-response nonce for inline scripts, available via request extensions.
#[derive(Debug, Clone)]
pub struct CspNonce(pub String);

/// Configuration snapshot for the headers middleware.
pub struct HeaderState {
    pub csp: CspConfig,
    pub hsts: bool,
}

impl HeaderState {
    pub fn from_config(security: &SecurityConfig) -> Self {
        Self {
            csp: security.csp.clone(),
            hsts: security.cookie_secure,
        }
    }
}

/// Middleware adding the security headers to every response.
pub async fn headers_middleware(
    State(state): State<Arc<HeaderState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(22)
        .map(char::from)
        .collect();
    request.extensions_mut().insert(CspNonce(nonce.clone()));

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&content_security_policy(&state.csp, &nonce)) {
        headers.insert("content-security-policy", value);
    }
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    if state.hsts {
        headers.insert(
            "strict-transport-security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

/// Build the CSP header value, appending the script nonce.
fn content_security_policy(csp: &CspConfig, nonce: &str) -> String {
    let mut script_src = csp.script_src.join(" ");
    script_src.push_str(&format!(" 'nonce-{}'", nonce));

    format!(
        "default-src {}; style-src {}; script-src {}; img-src {}",
        csp.default_src.join(" "),
        csp.style_src.join(" "),
        script_src,
        csp.img_src.join(" "),
    )
}
