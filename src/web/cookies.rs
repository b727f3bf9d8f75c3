//! Cookie reading and writing.
//!
//! # Responsibilities
//! - Parse the request `Cookie` header
//! - Build `Set-Cookie` response headers with the right attributes
//!
//! # Design Decisions
//! - Cookies default to HttpOnly, SameSite=Lax, Path=/
//! - The Secure attribute follows the `security.cookie_secure` setting
//! - Values are stored percent-free; callers keep values cookie-safe

use axum::http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};

/// Read a cookie value from the request headers.
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let raw = header.to_str().ok()?;
        for pair in raw.split(';') {
            let (key, value) = pair.trim().split_once('=')?;
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// A cookie to set on a response.
#[derive(Debug, Clone)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// Max-Age in seconds; None makes a session cookie.
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
}

impl SetCookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            max_age: None,
            http_only: true,
            secure: false,
        }
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Allow client-side scripts to read this cookie.
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// A cookie that removes `name` from the client.
    pub fn removal(name: &str) -> Self {
        Self::new(name, "").max_age(0)
    }

    fn to_header_value(&self) -> HeaderValue {
        let mut cookie = format!("{}={}; Path=/; SameSite=Lax", self.name, self.value);
        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
            .unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

/// Append a Set-Cookie header to response headers.
pub fn set(headers: &mut HeaderMap, cookie: &SetCookie) {
    headers.append(SET_COOKIE, cookie.to_header_value());
}
