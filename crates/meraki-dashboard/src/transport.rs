//! HTTP transport for the Meraki Dashboard API.
//!
//! [`DashboardTransport`] is the seam between the registry and the network:
//! one async method that carries a prepared [`ApiCall`]. Production uses
//! [`HttpTransport`] (reqwest); tests substitute a fake that returns canned
//! JSON without touching the network.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::catalog::HttpVerb;

/// Base URL of the Meraki Dashboard API v1.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// A fully prepared dashboard request: path params already substituted,
/// remaining arguments split into query string and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub verb: HttpVerb,
    /// Path under the base URL, e.g. `/devices/Q2XX-AAAA-BBBB`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Carries an [`ApiCall`] to the dashboard and returns the JSON response.
#[async_trait]
pub trait DashboardTransport: Send + Sync {
    async fn send(&self, call: ApiCall) -> Result<Value>;
}

/// reqwest-backed transport with bearer authentication.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport against the production dashboard.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Build a transport against an alternate base URL (regional clusters,
    /// test servers).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("meraki-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl DashboardTransport for HttpTransport {
    async fn send(&self, call: ApiCall) -> Result<Value> {
        let url = format!("{}{}", self.base_url, call.path);
        tracing::debug!(verb = call.verb.as_str(), %url, "dashboard request");

        let mut request = match call.verb {
            HttpVerb::Get => self.client.get(&url),
            HttpVerb::Post => self.client.post(&url),
            HttpVerb::Put => self.client.put(&url),
            HttpVerb::Delete => self.client.delete(&url),
        }
        .bearer_auth(&self.api_key)
        .query(&call.query);

        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.context("dashboard request failed")?;
        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read dashboard response body")?;

        if !status.is_success() {
            bail!("{} {}: {}", status.as_u16(), call.path, text.trim());
        }

        // Successful deletes and some updates answer with an empty body.
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .with_context(|| format!("dashboard returned non-JSON body for {}", call.path))
    }
}
