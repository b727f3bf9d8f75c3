//! Point API client.
//!
//! The point API speaks `application/geo+json`: every point is a GeoJSON
//! feature with its name and timestamps in `properties`. No authentication.

use geojson::{Feature, FeatureCollection, Geometry};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::upstream::client::{decode_error, transport_error, unexpected_status};

const GEO_JSON: &str = "application/geo+json";

/// Optional list filters, passed through as a query string.
#[derive(Debug, Clone, Default)]
pub struct PointFilters {
    pub sort: Option<String>,
    pub name: Option<String>,
}

impl PointFilters {
    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(sort) = &self.sort {
            pairs.append_pair("sort", sort);
        }
        if let Some(name) = &self.name {
            pairs.append_pair("name", name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.name.is_none()
    }
}

/// Client for the point API.
#[derive(Clone)]
pub struct PointApi {
    client: reqwest::Client,
    base: Url,
}

impl PointApi {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base: Url::parse(base_url)?,
        })
    }

    fn collection_url(&self, filters: &PointFilters) -> Url {
        let mut url = self.base.clone();
        url.set_path("/points");
        if !filters.is_empty() {
            filters.apply(&mut url);
        }
        url
    }

    fn point_url(&self, id: Uuid) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/points/{}", id));
        url
    }

    fn feature_body(name: &str, geometry: &Geometry) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": { "name": name },
            "geometry": geometry,
        })
    }

    /// Create a new point.
    pub async fn create(&self, name: &str, geometry: &Geometry) -> Result<Feature, AppError> {
        let url = self.collection_url(&PointFilters::default());
        let response = self
            .client
            .post(url)
            .header(ACCEPT, GEO_JSON)
            .header(CONTENT_TYPE, GEO_JSON)
            .json(&Self::feature_body(name, geometry))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::CREATED => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Get the (optionally filtered) list of points.
    pub async fn list(&self, filters: &PointFilters) -> Result<FeatureCollection, AppError> {
        let response = self
            .client
            .get(self.collection_url(filters))
            .header(ACCEPT, GEO_JSON)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            // No points yet; render an empty map rather than an error.
            StatusCode::NO_CONTENT => Ok(FeatureCollection {
                features: vec![],
                bbox: None,
                foreign_members: None,
            }),
            status => Err(unexpected_status(status)),
        }
    }

    /// Get the list of points as CSV text.
    pub async fn list_csv(&self, filters: &PointFilters) -> Result<String, AppError> {
        let response = self
            .client
            .get(self.collection_url(filters))
            .header(ACCEPT, "text/csv")
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.text().await.map_err(decode_error),
            StatusCode::NO_CONTENT => Ok(String::new()),
            status => Err(unexpected_status(status)),
        }
    }

    /// Get a point with a specific ID.
    pub async fn get(&self, id: Uuid) -> Result<Feature, AppError> {
        let response = self
            .client
            .get(self.point_url(id))
            .header(ACCEPT, GEO_JSON)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Replace a point with a specific ID.
    pub async fn edit(
        &self,
        id: Uuid,
        name: &str,
        geometry: &Geometry,
    ) -> Result<Feature, AppError> {
        let response = self
            .client
            .put(self.point_url(id))
            .header(ACCEPT, GEO_JSON)
            .header(CONTENT_TYPE, GEO_JSON)
            .json(&Self::feature_body(name, geometry))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Delete a point with a specific ID.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.point_url(id))
            .header(ACCEPT, GEO_JSON)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(unexpected_status(status)),
        }
    }
}
