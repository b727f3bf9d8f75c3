//! Request error type and HTML error responses.
//!
//! # Responsibilities
//! - One error enum for every handler and upstream failure mode
//! - Map upstream failures to appropriate HTTP status codes
//! - Render the HTML error page for browsers
//!
//! # Design Decisions
//! - Upstream timeouts surface as 504 Gateway Timeout
//! - Any unexpected upstream reply is a 502, never passed through verbatim
//! - Error responses are always text/html; this service only talks to browsers

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::web::templates;

/// Errors that can occur while serving a page.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream API did not answer within the configured timeout.
    #[error("upstream request timed out")]
    UpstreamTimeout,

    /// Upstream API was unreachable or answered with an unexpected status.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// The request lacked valid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The client or this service was rate limited.
    #[error("too many requests")]
    TooManyRequests,

    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A page template failed to render.
    #[error("template error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Title shown on the error page.
    fn title(&self) -> &'static str {
        match self {
            AppError::UpstreamTimeout => "Service timed out",
            AppError::Upstream(_) => "Service unavailable",
            AppError::NotFound => "Page not found",
            AppError::Unauthorized => "You are not signed in",
            AppError::TooManyRequests => "Too many requests",
            AppError::BadRequest(_) => "Bad request",
            AppError::Render(_) => "Something went wrong",
        }
    }

    /// Short description shown under the title.
    fn description(&self) -> &'static str {
        match self {
            AppError::UpstreamTimeout => "The service behind this page took too long to respond. Try again shortly.",
            AppError::Upstream(_) => "The service behind this page is not responding. Try again shortly.",
            AppError::NotFound => "If you typed the web address, check it is correct.",
            AppError::Unauthorized => "Sign in and try again.",
            AppError::TooManyRequests => "You have sent too many requests. Wait a moment and try again.",
            AppError::BadRequest(_) => "The request could not be understood.",
            AppError::Render(_) => "Try again later.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let body = templates::error_page(status, self.title(), self.description());
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::UpstreamTimeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(AppError::Upstream("boom".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
