//! Thing API client: users resource.
//!
//! Same wire conventions as things; creating a user is the one
//! unauthenticated call (it is how accounts come to exist).

use chrono::{DateTime, FixedOffset};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::upstream::client::{decode_error, transport_error, unexpected_status};

/// A user account as the upstream serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email_address: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Optional list filters, passed through as a query string.
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub sort: Option<String>,
    pub email_address: Option<String>,
}

impl UserFilters {
    fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(sort) = &self.sort {
            pairs.append_pair("sort", sort);
        }
        if let Some(email_address) = &self.email_address {
            pairs.append_pair("email_address", email_address);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.email_address.is_none()
    }
}

/// Client for the users resource.
#[derive(Clone)]
pub struct UserApi {
    client: reqwest::Client,
    base: Url,
    version: String,
}

impl UserApi {
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

    fn collection_url(&self, filters: &UserFilters) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/users", self.version));
        if !filters.is_empty() {
            filters.apply(&mut url);
        }
        url
    }

    fn user_url(&self, id: Uuid) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/users/{}", self.version, id));
        url
    }

    /// Create a new user. No token; this call is how accounts come to exist.
    pub async fn create(&self, email_address: &str, password: &str) -> Result<User, AppError> {
        let response = self
            .client
            .post(self.collection_url(&UserFilters::default()))
            .header(ACCEPT, "application/json")
            .json(&json!({ "email_address": email_address, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::CREATED => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Get the (optionally filtered) list of users.
    pub async fn list(&self, token: &str, filters: &UserFilters) -> Result<Vec<User>, AppError> {
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

    /// Get the list of users as CSV text.
    pub async fn list_csv(&self, token: &str, filters: &UserFilters) -> Result<String, AppError> {
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

    /// Get a user with a specific ID.
    pub async fn get(&self, token: &str, id: Uuid) -> Result<User, AppError> {
        let response = self
            .client
            .get(self.user_url(id))
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

    /// Replace a user with a specific ID.
    pub async fn edit(
        &self,
        token: &str,
        id: Uuid,
        email_address: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let response = self
            .client
            .put(self.user_url(id))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&json!({ "email_address": email_address, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }

    /// Delete a user with a specific ID.
    pub async fn delete(&self, token: &str, id: Uuid) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.user_url(id))
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
