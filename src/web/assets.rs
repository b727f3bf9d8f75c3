//! Embedded static assets.
//!
//! The assets are kept as `&'static str` so they can be bundled directly
//! inside the binary without filesystem lookups.

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

const STYLESHEET: &str = include_str!("../../static/style.css");

/// `GET /static/style.css`
pub async fn stylesheet() -> Response {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET).into_response()
}
