//! Typed views over upstream GeoJSON features.
//!
//! The point API serves `application/geo+json` features with the point's
//! name and timestamps inside `properties`. Pages work with this flattened
//! view instead of poking into the raw JSON.

use chrono::{DateTime, FixedOffset};
use geojson::{feature::Id, Feature, Value};
use serde::Serialize;
use uuid::Uuid;

/// Timestamp format used by the point API (RFC 3339 with fractional seconds).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// A point feature flattened for page rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PointView {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geometry: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl PointView {
    /// Flatten an upstream feature.
    ///
    /// The upstream owns the schema; anything missing or malformed is a
    /// protocol violation reported as an error string for the caller to wrap.
    pub fn from_feature(feature: &Feature) -> Result<Self, String> {
        let id = match &feature.id {
            Some(Id::String(s)) => Uuid::parse_str(s).map_err(|_| format!("feature id is not a UUID: {:?}", s))?,
            Some(Id::Number(n)) => return Err(format!("feature id is not a UUID: {}", n)),
            None => return Err("feature has no id".to_string()),
        };

        let properties = feature
            .properties
            .as_ref()
            .ok_or("feature has no properties")?;

        let name = properties
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or("feature has no name property")?
            .to_string();

        let created_at = parse_timestamp(properties.get("created_at"))?
            .ok_or("feature has no created_at property")?;
        let updated_at = parse_timestamp(properties.get("updated_at"))?;

        let geometry = feature.geometry.as_ref().ok_or("feature has no geometry")?;
        let (longitude, latitude) = match &geometry.value {
            Value::Point(position) if position.len() >= 2 => (position[0], position[1]),
            _ => return Err("feature geometry is not a point".to_string()),
        };

        Ok(Self {
            id,
            name,
            latitude,
            longitude,
            geometry: serde_json::to_value(geometry).map_err(|e| e.to_string())?,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(
    value: Option<&serde_json::Value>,
) -> Result<Option<DateTime<FixedOffset>>, String> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => DateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Some)
            .map_err(|e| format!("bad timestamp {:?}: {}", s, e)),
        Some(other) => Err(format!("bad timestamp: {}", other)),
    }
}
