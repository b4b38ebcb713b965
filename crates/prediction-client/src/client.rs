//! HTTP client for the prediction API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use url::Url;

#[cfg(test)]
mod tests;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Stock Prediction API.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Liveness
    // ========================================================================

    /// Calls the liveness endpoint.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn hello(&self) -> Result<HelloResponse, Error> {
        let url = format!("{}/api/v1/hello", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Prediction Records
    // ========================================================================

    /// Lists prediction records.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_data(&self, params: &DataParams) -> Result<DataListResponse, Error> {
        let url = self.data_url(params)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Lists distinct symbols, optionally filtered by a search term.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_symbols(&self, query: Option<&str>) -> Result<SymbolsResponse, Error> {
        let url = self.symbols_url(query)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Fetches a path relative to the base URL and returns the raw body.
    ///
    /// Useful for checking that repeated requests produce identical payloads.
    ///
    /// # Errors
    /// Returns error if the request fails or the status is not successful.
    pub async fn get_raw(&self, path_and_query: &str) -> Result<Vec<u8>, Error> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.bytes().await?.to_vec())
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn data_url(&self, params: &DataParams) -> Result<String, Error> {
        let query = serde_urlencoded::to_string(params)?;
        if query.is_empty() {
            Ok(format!("{}/api/v1/data", self.base_url))
        } else {
            Ok(format!("{}/api/v1/data?{}", self.base_url, query))
        }
    }

    fn symbols_url(&self, query: Option<&str>) -> Result<String, Error> {
        match query {
            Some(q) => Ok(format!(
                "{}/api/v1/symbols?{}",
                self.base_url,
                serde_urlencoded::to_string(&[("query", q)][..])?
            )),
            None => Ok(format!("{}/api/v1/symbols", self.base_url)),
        }
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    async fn error_from(resp: reqwest::Response) -> Error {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status.as_u16() == 404 {
            Error::NotFound(text)
        } else {
            Error::Api {
                status: status.as_u16(),
                message: text,
            }
        }
    }
}
