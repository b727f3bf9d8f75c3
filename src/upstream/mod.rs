//! Upstream API integration subsystem.
//!
//! # Data Flow
//! ```text
//! page handler
//!     → points.rs / things.rs / users.rs / auth.rs (typed calls)
//!     → client.rs (shared reqwest client, timeout, error mapping)
//!     → point API (application/geo+json) / thing API (JSON, bearer auth)
//! ```
//!
//! # Design Decisions
//! - One shared client; the configured timeout bounds every call
//! - Expected statuses are matched explicitly; everything else maps through
//!   one status→error table
//! - CSV passes through untouched; this service adds headers, not rows

pub mod auth;
pub mod client;
pub mod points;
pub mod things;
pub mod users;

pub use auth::AuthApi;
pub use points::{PointApi, PointFilters};
pub use things::{Thing, ThingApi, ThingFilters};
pub use users::{User, UserApi, UserFilters};
