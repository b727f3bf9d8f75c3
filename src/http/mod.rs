//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, routes, middleware stack)
//!     → request.rs (stamp request ID)
//!     → security layers (rate limit, headers, CSRF)
//!     → web handlers
//!     → error.rs (uniform HTML error responses)
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use error::AppError;
pub use request::{RequestId, RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
