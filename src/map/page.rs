//! Map page payload.
//!
//! Everything the index template needs to initialize the map: the container
//! id, the tile layer settings, the feature collection with popups already
//! bound, and the server-computed viewport bounds.

use geojson::FeatureCollection;
use serde::Serialize;

use crate::config::MapConfig;
use crate::geo::bounds;
use crate::map::popup;

/// Data handed to the index template.
#[derive(Debug, Clone, Serialize)]
pub struct MapPage {
    /// DOM id of the map container element.
    pub container_id: String,

    /// Tile URL template with {s}/{z}/{x}/{y} placeholders.
    pub tile_url: String,

    /// Maximum zoom bound for the tile layer.
    pub max_zoom: u8,

    /// Attribution markup for the tile layer.
    pub attribution: String,

    /// The overlay data, popups bound.
    pub geojson: serde_json::Value,

    /// Viewport corners `[[south, west], [north, east]]`; None when the
    /// collection has no coordinates and the page keeps a whole-world view.
    pub bounds: Option<[[f64; 2]; 2]>,

    /// Number of features, shown in the page header.
    pub feature_count: usize,
}

impl MapPage {
    /// Assemble the page payload from configuration and upstream data.
    pub fn build(config: &MapConfig, mut collection: FeatureCollection) -> Result<Self, String> {
        popup::bind_popups(&mut collection);
        let bounds = bounds::of_collection(&collection).map(|b| b.corners());
        let feature_count = collection.features.len();
        let geojson = serde_json::to_value(&collection).map_err(|e| e.to_string())?;

        Ok(Self {
            container_id: config.container_id.clone(),
            tile_url: config.tile_url.clone(),
            max_zoom: config.max_zoom,
            attribution: config.attribution.clone(),
            geojson,
            bounds,
            feature_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Feature, Geometry, Value};
    use serde_json::json;

    fn named_point(name: &str, lon: f64, lat: f64) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
            id: None,
            properties: match json!({"name": name}) {
                serde_json::Value::Object(map) => Some(map),
                _ => unreachable!(),
            },
            foreign_members: None,
        }
    }

    #[test]
    fn test_build_carries_tile_settings() {
        let config = MapConfig::default();
        let page = MapPage::build(
            &config,
            FeatureCollection {
                features: vec![],
                bbox: None,
                foreign_members: None,
            },
        )
        .unwrap();

        assert_eq!(page.container_id, "mapid");
        assert_eq!(page.tile_url, "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert_eq!(page.max_zoom, 19);
        assert!(page.attribution.contains("OpenStreetMap contributors"));
        assert!(page.bounds.is_none());
        assert_eq!(page.feature_count, 0);
    }

    #[test]
    fn test_build_binds_popups_and_bounds() {
        let config = MapConfig::default();
        let page = MapPage::build(
            &config,
            FeatureCollection {
                features: vec![named_point("A", 1.0, 2.0), named_point("B", -3.0, 5.0)],
                bbox: None,
                foreign_members: None,
            },
        )
        .unwrap();

        assert_eq!(page.bounds, Some([[2.0, -3.0], [5.0, 1.0]]));
        let features = page.geojson["features"].as_array().unwrap();
        assert_eq!(features[0]["properties"]["popup"], "A");
        assert_eq!(features[1]["properties"]["popup"], "B");
    }
}
