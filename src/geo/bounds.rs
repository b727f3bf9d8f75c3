//! Bounding boxes over GeoJSON geometry.
//!
//! The map page fits its viewport to the box computed here, so every
//! coordinate of every geometry kind has to count, interior polygon rings
//! and nested collections included.

use geojson::{FeatureCollection, Geometry, Value};

/// A geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    fn from_position(position: &[f64]) -> Option<Self> {
        let (lon, lat) = (*position.first()?, *position.get(1)?);
        Some(Self {
            south: lat,
            west: lon,
            north: lat,
            east: lon,
        })
    }

    fn extend(&mut self, other: Bounds) {
        self.south = self.south.min(other.south);
        self.west = self.west.min(other.west);
        self.north = self.north.max(other.north);
        self.east = self.east.max(other.east);
    }

    /// Corner pairs in `[[south, west], [north, east]]` order, the shape the
    /// map viewport fit expects.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

/// Bounding box of every feature geometry in the collection.
///
/// Returns None when no feature carries coordinates.
pub fn of_collection(collection: &FeatureCollection) -> Option<Bounds> {
    let mut merged: Option<Bounds> = None;
    for feature in &collection.features {
        if let Some(geometry) = &feature.geometry {
            merge(&mut merged, of_geometry(geometry));
        }
    }
    merged
}

/// Bounding box of a single geometry.
pub fn of_geometry(geometry: &Geometry) -> Option<Bounds> {
    let mut merged: Option<Bounds> = None;
    match &geometry.value {
        Value::Point(position) => merge(&mut merged, Bounds::from_position(position)),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            for position in positions {
                merge(&mut merged, Bounds::from_position(position));
            }
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            for line in lines {
                for position in line {
                    merge(&mut merged, Bounds::from_position(position));
                }
            }
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    for position in ring {
                        merge(&mut merged, Bounds::from_position(position));
                    }
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for inner in geometries {
                merge(&mut merged, of_geometry(inner));
            }
        }
    }
    merged
}

fn merge(into: &mut Option<Bounds>, bounds: impl Into<Option<Bounds>>) {
    if let Some(bounds) = bounds.into() {
        match into {
            Some(existing) => existing.extend(bounds),
            None => *into = Some(bounds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Feature;

    fn point(lon: f64, lat: f64) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    #[test]
    fn test_single_point_degenerate_box() {
        let collection = FeatureCollection {
            features: vec![point(-0.1, 51.5)],
            bbox: None,
            foreign_members: None,
        };
        let bounds = of_collection(&collection).unwrap();
        assert_eq!(bounds.corners(), [[51.5, -0.1], [51.5, -0.1]]);
    }

    #[test]
    fn test_points_merge() {
        let collection = FeatureCollection {
            features: vec![point(-0.1, 51.5), point(2.35, 48.85), point(13.4, 52.5)],
            bbox: None,
            foreign_members: None,
        };
        let bounds = of_collection(&collection).unwrap();
        assert_eq!(bounds.south, 48.85);
        assert_eq!(bounds.west, -0.1);
        assert_eq!(bounds.north, 52.5);
        assert_eq!(bounds.east, 13.4);
    }

    #[test]
    fn test_polygon_rings_count() {
        let geometry = Geometry::new(Value::Polygon(vec![
            vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0], vec![0.0, 4.0], vec![0.0, 0.0]],
            // Interior ring poking outside the shell still widens the box.
            vec![vec![1.0, 1.0], vec![5.0, 1.0], vec![1.0, 2.0], vec![1.0, 1.0]],
        ]));
        let bounds = of_geometry(&geometry).unwrap();
        assert_eq!(bounds.east, 5.0);
        assert_eq!(bounds.north, 4.0);
    }

    #[test]
    fn test_geometry_collection_recurses() {
        let geometry = Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(Value::Point(vec![10.0, -5.0])),
            Geometry::new(Value::LineString(vec![vec![-3.0, 7.0], vec![1.0, 2.0]])),
        ]));
        let bounds = of_geometry(&geometry).unwrap();
        assert_eq!(bounds.corners(), [[-5.0, -3.0], [7.0, 10.0]]);
    }

    #[test]
    fn test_empty_collection_has_no_bounds() {
        let collection = FeatureCollection {
            features: vec![],
            bbox: None,
            foreign_members: None,
        };
        assert!(of_collection(&collection).is_none());

        // A feature without geometry contributes nothing.
        let empty = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        let collection = FeatureCollection {
            features: vec![empty],
            bbox: None,
            foreign_members: None,
        };
        assert!(of_collection(&collection).is_none());
    }
}
