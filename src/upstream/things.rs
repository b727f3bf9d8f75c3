//! Thing API client: things resource.
//!
//! Plain JSON, versioned base path, bearer-token auth on every call.

use chrono::{DateTime, FixedOffset};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::upstream::client::{decode_error, transport_error, unexpected_status};

/// A thing as the upstream serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing {
    pub id: Uuid,
    pub name: String,
    pub colour: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Optional list filters, passed through as a query string.
#[derive(Debug, Clone, Default)]
pub struct ThingFilters {
    pub sort: Option<String>,
    pub name: Option<String>,
    pub colour: Option<String>,
}

impl ThingFilters {
    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(sort) = &self.sort {
            pairs.append_pair("sort", sort);
        }
        if let Some(name) = &self.name {
            pairs.append_pair("name", name);
        }
        if let Some(colour) = &self.colour {
            pairs.append_pair("colour", colour);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.name.is_none() && self.colour.is_none()
    }
}

/// Client for the things resource.
#[derive(Clone)]
pub struct ThingApi {
    client: reqwest::Client,
    base: Url,
    version: String,
}

impl ThingApi {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        version: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base: Url::parse(base_url)?,
            version: version.to_string(),
        })
    }

    fn collection_url(&self, filters: &ThingFilters) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/things", self.version));
        if !filters.is_empty() {
            filters.apply(&mut url);
        }
        url
    }

    fn thing_url(&self, id: Uuid) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/things/{}", self.version, id));
        url
    }

    /// Create a new thing.
    pub async fn create(&self, token: &str, name: &str, colour: &str) -> Result<Thing, AppError> {
        let response = self
            .client
            .post(self.collection_url(&ThingFilters::default()))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&json!({ "name": name, "colour": colour }))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::CREATED => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Get the (optionally filtered) list of things.
    pub async fn list(&self, token: &str, filters: &ThingFilters) -> Result<Vec<Thing>, AppError> {
        let response = self
            .client
            .get(self.collection_url(filters))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            StatusCode::NO_CONTENT => Ok(vec![]),
            status => Err(unexpected_status(status)),
        }
    }

    /// Get the list of things as CSV text.
    pub async fn list_csv(&self, token: &str, filters: &ThingFilters) -> Result<String, AppError> {
        let response = self
            .client
            .get(self.collection_url(filters))
            .bearer_auth(token)
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

    /// Get a thing with a specific ID.
    pub async fn get(&self, token: &str, id: Uuid) -> Result<Thing, AppError> {
        let response = self
            .client
            .get(self.thing_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Replace a thing with a specific ID.
    pub async fn edit(
        &self,
        token: &str,
        id: Uuid,
        name: &str,
        colour: &str,
    ) -> Result<Thing, AppError> {
        let response = self
            .client
            .put(self.thing_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&json!({ "name": name, "colour": colour }))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Delete a thing with a specific ID.
    pub async fn delete(&self, token: &str, id: Uuid) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.thing_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(unexpected_status(status)),
        }
    }
}
