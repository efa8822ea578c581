//! Authenticated HTTP client for the UniFuncs API.

use std::time::Duration;

use reqwest::{Client, Method, header::CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{envelope::GatewayResponse, error::GatewayError};
use crate::core::config::Config;

/// HTTP client bound to one base URL and one API key.
///
/// Every call sends a JSON body with `Authorization: Bearer <key>` and is
/// unwrapped through [`GatewayResponse::from_body`]. Calls are never retried.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GatewayClient {
    /// Create a client for `base_url` authenticating with `api_key`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from the server configuration.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Self::new(
            config.gateway.base_url.clone(),
            config.credentials.api_key.clone(),
            Duration::from_secs(config.gateway.timeout_secs),
        )
    }

    /// Join a relative path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Send `parameters` as the JSON body of a `method` request to `path`.
    #[instrument(skip(self, parameters))]
    pub async fn send<P>(
        &self,
        method: Method,
        path: &str,
        parameters: &P,
    ) -> Result<GatewayResponse, GatewayError>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        debug!("Sending request to {}", url);

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .json(parameters)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        debug!(%status, content_type = ?content_type, "Received response");

        GatewayResponse::from_body(content_type.as_deref(), body)
    }

    /// Convenience wrapper for `POST` requests.
    pub async fn post<P>(&self, path: &str, parameters: &P) -> Result<GatewayResponse, GatewayError>
    where
        P: Serialize + ?Sized,
    {
        self.send(Method::POST, path, parameters).await
    }
}

/// Custom Debug implementation to keep the API key out of logs.
impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
