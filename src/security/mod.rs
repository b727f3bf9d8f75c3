//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP limits)
//!     → csrf.rs (verify form token on protected POSTs)
//!     → headers.rs (mint CSP nonce, add security headers on the way out)
//!
//! Cookies:
//!     → signing.rs (keyed signatures for flash and CSRF cookie values)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod csrf;
pub mod headers;
pub mod rate_limit;
pub mod signing;
