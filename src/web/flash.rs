//! One-shot flash messages.
//!
//! # Data Flow
//! ```text
//! handler sets flash
//!     → signed, base64-encoded cookie on the redirect response
//!     → next page render takes the message
//!     → removal cookie clears it
//! ```
//!
//! # Design Decisions
//! - Flash survives exactly one redirect; reading it always clears it
//! - The cookie is signed; a tampered flash reads as no flash
//! - Messages may carry markup (confirmation links), templates must not
//!   escape them twice

use axum::http::HeaderMap;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::security::signing;
use crate::web::cookies::{self, SetCookie};

const FLASH_COOKIE: &str = "flash";

/// A flash message carried to the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            category: "message".to_string(),
            message: message.into(),
        }
    }
}

/// Attach a flash message to an outgoing response.
pub fn set(headers: &mut HeaderMap, secret: &str, secure: bool, flash: &Flash) {
    let json = match serde_json::to_string(flash) {
        Ok(json) => json,
        Err(_) => return,
    };
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json);
    let cookie = SetCookie::new(FLASH_COOKIE, &signing::sign(secret, &payload)).secure(secure);
    cookies::set(headers, &cookie);
}

/// Read the pending flash message, if any.
///
/// The caller is responsible for clearing it with [`clear`] once rendered.
pub fn peek(headers: &HeaderMap, secret: &str) -> Option<Flash> {
    let raw = cookies::get(headers, FLASH_COOKIE)?;
    let payload = signing::verify(secret, &raw)?;
    let json = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    serde_json::from_slice(&json).ok()
}

/// Remove the flash cookie from the client.
pub fn clear(headers: &mut HeaderMap) {
    cookies::set(headers, &SetCookie::removal(FLASH_COOKIE));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_round_trip() {
        let flash = Flash::success("<a href='/points/1'>Foo</a> has been created.");
        let mut headers = HeaderMap::new();
        set(&mut headers, "secret", false, &flash);

        // Replay the Set-Cookie pair as a request Cookie header.
        let set_cookie = headers
            .get(axum::http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap();
        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            axum::http::header::COOKIE,
            pair.parse().unwrap(),
        );

        assert_eq!(peek(&request_headers, "secret"), Some(flash));
        assert_eq!(peek(&request_headers, "wrong-secret"), None);
    }

    #[test]
    fn test_no_flash_without_cookie() {
        assert_eq!(peek(&HeaderMap::new(), "secret"), None);
    }
}
