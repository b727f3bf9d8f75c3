//! Pointmap: a server-rendered map frontend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                   POINTMAP                      │
//!                      │                                                 │
//!   Browser Request    │  ┌─────────┐   ┌──────────┐   ┌────────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ security │──▶│    web     │   │
//!                      │  │ server  │   │ layers   │   │  handlers  │   │
//!                      │  └─────────┘   └──────────┘   └─────┬──────┘   │
//!                      │                                      │          │
//!                      │                                      ▼          │
//!                      │  ┌─────────┐   ┌──────────┐   ┌────────────┐   │     Point API
//!   Browser Response   │  │templates│◀──│ map/geo  │◀──│  upstream  │◀──┼──── (geo+json)
//!   ◀──────────────────┼──│ (pages) │   │ (bounds, │   │  clients   │◀──┼──── Thing API
//!                      │  └─────────┘   │  popups) │   └────────────┘   │     (JSON, auth)
//!                      │                └──────────┘                    │
//!                      │                                                 │
//!                      │  ┌──────────────────────────────────────────┐  │
//!                      │  │           Cross-Cutting Concerns          │  │
//!                      │  │  ┌────────┐ ┌──────────┐ ┌────────────┐  │  │
//!                      │  │  │ config │ │ tracing  │ │ rate limit │  │  │
//!                      │  │  └────────┘ └──────────┘ └────────────┘  │  │
//!                      │  └──────────────────────────────────────────┘  │
//!                      └────────────────────────────────────────────────┘
//! ```
//!
//! The service renders every page server-side: the index map (tile layer,
//! GeoJSON overlay with per-feature popups, viewport fitted to the data),
//! plus CRUD page sets for points, things, and users backed by two upstream
//! HTTP APIs.

// Core subsystems
pub mod config;
pub mod http;
pub mod upstream;
pub mod web;

// Map rendering
pub mod geo;
pub mod map;

// Cross-cutting concerns
pub mod security;

pub use config::AppConfig;
pub use http::error::AppError;
pub use http::HttpServer;
