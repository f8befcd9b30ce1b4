//! Catalog client trait and its HTTP implementation.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;

/// Public backend used when no other base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://numberscope.colorado.edu";

/// Body of `get_oeis_values`: decimal index to decimal value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuesResponse {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Body of `get_oeis_factors`: decimal index to encoded factorization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorsResponse {
    #[serde(default)]
    pub factors: BTreeMap<String, String>,
}

/// Bulk lookups against a remote sequence catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Up to `count` values of sequence `id`.
    async fn fetch_values(&self, id: &str, count: u64) -> Result<ValuesResponse, CatalogError>;

    /// Up to `count` factorizations of sequence `id`.
    async fn fetch_factors(&self, id: &str, count: u64) -> Result<FactorsResponse, CatalogError>;
}

/// [`CatalogClient`] speaking to a backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str, id: &str, count: u64) -> String {
        format!("{}/api/{name}/{id}/{count}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, CatalogError> {
        let started = Instant::now();
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = resp.text().await?;
        debug!(
            url = %url,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "catalog response"
        );
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn fetch_values(&self, id: &str, count: u64) -> Result<ValuesResponse, CatalogError> {
        self.get_json(self.endpoint("get_oeis_values", id, count))
            .await
    }

    async fn fetch_factors(&self, id: &str, count: u64) -> Result<FactorsResponse, CatalogError> {
        self.get_json(self.endpoint("get_oeis_factors", id, count))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        let catalog = HttpCatalog::new("http://localhost:5000/");
        assert_eq!(catalog.base_url(), "http://localhost:5000");
        assert_eq!(
            catalog.endpoint("get_oeis_values", "A000045", 1000),
            "http://localhost:5000/api/get_oeis_values/A000045/1000"
        );
        assert_eq!(
            catalog.endpoint("get_oeis_factors", "A000040", 20),
            "http://localhost:5000/api/get_oeis_factors/A000040/20"
        );
    }

    #[test]
    fn default_backend() {
        assert_eq!(HttpCatalog::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn decode_values_body() {
        let body = r#"{"name": "Fibonacci", "values": {"0": "0", "1": "1", "2": "1", "3": "2"}}"#;
        let resp: ValuesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.values.len(), 4);
        assert_eq!(resp.values["3"], "2");
    }

    #[test]
    fn decode_factors_body() {
        let body = r#"{"factors": {"1": "[]", "4": "[[2,2]]", "9": "no_fac"}}"#;
        let resp: FactorsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.factors["4"], "[[2,2]]");
    }

    #[test]
    fn missing_field_is_empty() {
        let resp: ValuesResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.values.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_is_http_error() {
        let catalog = HttpCatalog::new("http://127.0.0.1:9");
        let err = catalog.fetch_values("A000045", 10).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
