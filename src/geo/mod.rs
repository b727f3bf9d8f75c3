//! Geographic data handling.
//!
//! # Data Flow
//! ```text
//! upstream application/geo+json
//!     → geojson::FeatureCollection (serde)
//!     → feature.rs (flattened PointView for page rendering)
//!     → bounds.rs (viewport box for the map page)
//! ```

pub mod bounds;
pub mod feature;

pub use bounds::Bounds;
pub use feature::PointView;
