//! CSRF protection for form submissions.
//!
//! # Responsibilities
//! - Issue a per-client CSRF token in a signed cookie
//! - Expose the token to handlers so forms can embed it as a hidden field
//! - Verify the submitted field against the cookie on protected POSTs
//!
//! # Design Decisions
//! - Double-submit scheme: cookie and hidden field must carry the same token
//! - Delete confirmation routes are exempt, matching the original frontend
//! - A failed check redirects back to the form with an "expired" flash,
//!   never a bare error page

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{request::Parts, Method, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::security::signing;
use crate::web::cookies::{self, SetCookie};
use crate::web::flash::{self, Flash};

/// Name of the hidden form field carrying the token.
pub const CSRF_FIELD: &str = "csrf_token";

const CSRF_COOKIE: &str = "csrf_token";

/// The current request's CSRF token, available to handlers via extensions.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

/// Configuration snapshot for the CSRF middleware.
pub struct CsrfState {
    pub secret: String,
    pub cookie_secure: bool,
    pub enabled: bool,
    pub max_body_bytes: usize,
}

/// Middleware enforcing the double-submit check.
pub async fn csrf_middleware(
    State(state): State<Arc<CsrfState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let existing = cookies::get(request.headers(), CSRF_COOKIE)
        .and_then(|raw| signing::verify(&state.secret, &raw).map(str::to_string));
    let (token, fresh) = match existing {
        Some(token) => (token, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    };

    let mut request = request;
    request.extensions_mut().insert(CsrfToken(token.clone()));

    if state.enabled && request.method() == Method::POST && !is_exempt(request.uri().path()) {
        let (parts, body) = request.into_parts();
        let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return AppError::BadRequest("unreadable request body".into()).into_response()
            }
        };

        let submitted = form_field(&bytes, CSRF_FIELD);
        if fresh || submitted.as_deref() != Some(token.as_str()) {
            tracing::warn!(path = %parts.uri.path(), "CSRF token missing or stale");
            return expired_response(&parts, &state, &token, fresh);
        }

        request = Request::from_parts(parts, Body::from(bytes));
    }

    let mut response = next.run(request).await;
    if fresh {
        set_token_cookie(response.headers_mut(), &state, &token);
    }
    response
}

/// Extract a single field from an urlencoded body.
fn form_field(bytes: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(bytes)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Delete confirmations are submitted from their own confirmation page.
fn is_exempt(path: &str) -> bool {
    path.ends_with("/delete")
}

fn set_token_cookie(headers: &mut axum::http::HeaderMap, state: &CsrfState, token: &str) {
    let cookie = SetCookie::new(CSRF_COOKIE, &signing::sign(&state.secret, token))
        .secure(state.cookie_secure);
    cookies::set(headers, &cookie);
}

/// Send the client back to the form it was submitting.
fn expired_response(parts: &Parts, state: &CsrfState, token: &str, fresh: bool) -> Response {
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let mut response = Redirect::to(target).into_response();
    flash::set(
        response.headers_mut(),
        &state.secret,
        state.cookie_secure,
        &Flash::notice("The form you were submitting has expired. Please try again."),
    );
    if fresh {
        set_token_cookie(response.headers_mut(), state, token);
    }
    response
}
