//! PokeAPI client

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Raw body of `GET /type/{name}`.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryListing {
    pub body: Value,
}

impl CategoryListing {
    /// Members tagged with the type, or `None` when the field is missing or not a list.
    pub fn members(&self) -> Option<&[Value]> {
        self.body
            .get("pokemon")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// `entry.pokemon.name`, treating empty and non-string names as missing.
    pub fn member_name(entry: &Value) -> Option<&str> {
        entry
            .pointer("/pokemon/name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Raw body of `GET /pokemon/{name}`, paired with the name it was requested by.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailRecord {
    pub name: String,
    pub body: Value,
}

/// The two catalog lookups a batch load needs.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn fetch_by_category(&self, category: &str) -> Result<CategoryListing, FetchError>;

    async fn fetch_detail(&self, name: &str) -> Result<DetailRecord, FetchError>;
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base: String,
}

impl CatalogClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            http: http_client().clone(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn endpoint(&self, resource: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base, resource, urlencoding::encode(key))
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(|err| {
            tracing::warn!(url, error = %err, "reading response body failed");
            FetchError::Request(err.to_string())
        })?;
        Ok(bytes.to_vec())
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.send(url).await?;
        response.json::<Value>().await.map_err(|err| {
            tracing::warn!(url, error = %err, "malformed catalog response");
            FetchError::Decode(err.to_string())
        })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self.http.get(url).send().await.map_err(|err| {
            tracing::warn!(url, error = %err, "catalog request failed");
            FetchError::Request(err.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "catalog request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch_by_category(&self, category: &str) -> Result<CategoryListing, FetchError> {
        let url = self.endpoint("type", category);
        let body = self.fetch_json(&url).await?;
        Ok(CategoryListing { body })
    }

    async fn fetch_detail(&self, name: &str) -> Result<DetailRecord, FetchError> {
        let url = self.endpoint("pokemon", name);
        let body = self.fetch_json(&url).await?;
        Ok(DetailRecord {
            name: name.to_string(),
            body,
        })
    }
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}
