//! Page handlers and form plumbing.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → home.rs / points.rs / things.rs / users.rs / auth.rs (handlers)
//!     → forms.rs (validate submissions, per-field messages)
//!     → upstream clients (data)
//!     → templates.rs (handlebars render)
//!     → cookies.rs / flash.rs (state carried between requests)
//! ```
//!
//! # Design Decisions
//! - Handlers return Result<Response, AppError>; one error page for all
//! - Invalid forms re-render inline with messages, never a 4xx
//! - Mutations redirect and flash (post/redirect/get throughout)

pub mod assets;
pub mod auth;
pub mod cookies;
pub mod flash;
pub mod forms;
pub mod home;
pub mod points;
pub mod templates;
pub mod things;
pub mod users;

use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};

use crate::config::SecurityConfig;
use crate::http::error::AppError;
use flash::Flash;

/// Name of the bearer-token cookie set at login.
pub const TOKEN_COOKIE: &str = "token";

/// Bearer token for the thing API, taken from the login cookie.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    cookies::get(headers, TOKEN_COOKIE).ok_or(AppError::Unauthorized)
}

/// Redirect with a flash message on the way out.
pub fn redirect_with_flash(security: &SecurityConfig, to: &str, message: Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    flash::set(
        response.headers_mut(),
        &security.secret_key,
        security.cookie_secure,
        &message,
    );
    response
}

/// Treat an absent or empty query value as "no filter".
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Rebuild the query-string suffix for download links (`?sort=…` or empty).
pub fn filter_query(pairs: &[(&str, Option<&str>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}
