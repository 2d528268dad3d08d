//! SalesBuildr API client.
//!
//! [`SalesBuildrApi`] is the seam the tool handlers call through. The
//! production implementation, [`HttpSalesBuildrClient`], speaks the REST API
//! with `reqwest`; tests substitute an in-memory fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use super::error::{UpstreamError, UpstreamResult};
use crate::domains::navigation::Domain;

/// Header carrying the API key on every upstream request.
pub const API_KEY_HEADER: &str = "api-key";

/// Longest upstream body echoed back in an error message.
const MAX_ERROR_BODY: usize = 500;

/// Credentials and endpoint used to build a client.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Pagination and search parameters for list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// CRUD operations against SalesBuildr resources.
///
/// Every method performs exactly one upstream request.
#[async_trait]
pub trait SalesBuildrApi: Send + Sync {
    async fn list(&self, domain: Domain, query: &ListQuery) -> UpstreamResult<Value>;

    async fn get(&self, domain: Domain, id: &str) -> UpstreamResult<Value>;

    async fn create(&self, domain: Domain, payload: Value) -> UpstreamResult<Value>;

    async fn update(&self, domain: Domain, id: &str, payload: Value) -> UpstreamResult<Value>;

    async fn delete(&self, domain: Domain, id: &str) -> UpstreamResult<Value>;
}

/// REST collection name for a domain.
pub fn resource_path(domain: Domain) -> &'static str {
    match domain {
        Domain::Companies => "companies",
        Domain::Contacts => "contacts",
        Domain::Products => "products",
        Domain::Opportunities => "opportunities",
        Domain::Quotes => "quotes",
    }
}

/// `reqwest`-backed SalesBuildr client.
pub struct HttpSalesBuildrClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpSalesBuildrClient {
    /// Build a client for the given credentials.
    pub fn new(credentials: &Credentials) -> UpstreamResult<Self> {
        let base_url = Url::parse(&credentials.base_url)
            .map_err(|_| UpstreamError::InvalidBaseUrl(credentials.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(credentials.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(credentials.timeout)
            .user_agent(concat!("salesbuildr-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: credentials.api_key.clone(),
        })
    }

    /// Build the URL for a collection or a single resource.
    fn endpoint(&self, domain: Domain, id: Option<&str>) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(resource_path(domain));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> UpstreamResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            error!("SalesBuildr API error {}: {}", status.as_u16(), message);
            return Err(UpstreamError::status(status.as_u16(), message));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SalesBuildrApi for HttpSalesBuildrClient {
    async fn list(&self, domain: Domain, query: &ListQuery) -> UpstreamResult<Value> {
        let url = self.endpoint(domain, None)?;
        debug!(%url, ?query, "GET collection");
        self.send(self.request(Method::GET, url).query(query)).await
    }

    async fn get(&self, domain: Domain, id: &str) -> UpstreamResult<Value> {
        let url = self.endpoint(domain, Some(id))?;
        debug!(%url, "GET resource");
        self.send(self.request(Method::GET, url)).await
    }

    async fn create(&self, domain: Domain, payload: Value) -> UpstreamResult<Value> {
        let url = self.endpoint(domain, None)?;
        debug!(%url, "POST resource");
        self.send(self.request(Method::POST, url).json(&payload)).await
    }

    async fn update(&self, domain: Domain, id: &str, payload: Value) -> UpstreamResult<Value> {
        let url = self.endpoint(domain, Some(id))?;
        debug!(%url, "PUT resource");
        self.send(self.request(Method::PUT, url).json(&payload)).await
    }

    async fn delete(&self, domain: Domain, id: &str) -> UpstreamResult<Value> {
        let url = self.endpoint(domain, Some(id))?;
        debug!(%url, "DELETE resource");
        self.send(self.request(Method::DELETE, url)).await
    }
}

/// Pull a readable message out of an upstream error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error", "detail", "title"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                return Some(text.to_string());
            }
        }
    }

    Some(trimmed.chars().take(MAX_ERROR_BODY).collect())
}
