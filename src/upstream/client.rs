//! Shared HTTP client plumbing for upstream APIs.
//!
//! # Responsibilities
//! - Build the one timeout-bounded reqwest client both APIs share
//! - Map transport failures and unexpected statuses to AppError
//!
//! # Design Decisions
//! - Upstream replies are never passed through to the client verbatim
//! - 401/404/429 keep their meaning across the edge; anything else is a 502

use std::time::Duration;

use reqwest::StatusCode;

use crate::http::error::AppError;

/// Build the shared upstream HTTP client.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Map a transport-level failure.
pub fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamTimeout
    } else {
        AppError::Upstream(err.to_string())
    }
}

/// Map an upstream status the caller did not expect.
pub fn unexpected_status(status: StatusCode) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::NOT_FOUND => AppError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => AppError::TooManyRequests,
        status => AppError::Upstream(format!("unexpected upstream status {}", status)),
    }
}

/// Map a body that failed to decode as the expected shape.
pub fn decode_error(err: impl std::fmt::Display) -> AppError {
    AppError::Upstream(format!("malformed upstream response: {}", err))
}
