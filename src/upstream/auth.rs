//! Thing API client: token endpoint.

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::http::error::AppError;
use crate::upstream::client::{decode_error, transport_error, unexpected_status};

/// A bearer token as the upstream issues it.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub token: String,
}

/// Client for the auth/token endpoint.
#[derive(Clone)]
pub struct AuthApi {
    client: reqwest::Client,
    base: Url,
    version: String,
}

impl AuthApi {
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

    /// Exchange HTTP Basic credentials for a bearer token.
    pub async fn login(&self, email_address: &str, password: &str) -> Result<Token, AppError> {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/auth/token", self.version));

        let response = self
            .client
            .get(url)
            .basic_auth(email_address, Some(password))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => response.json().await.map_err(decode_error),
            status => Err(unexpected_status(status)),
        }
    }
}
