//! HTTP client for the backend under test.
//!
//! Thin typed wrapper over `reqwest` with a fixed base URL and a
//! per-request timeout. Responses are captured raw first and decoded in a
//! second explicit step, so transport failures and undecodable bodies stay
//! separate failure domains.

pub mod types;

use std::time::Duration;
use thiserror::Error;

pub use types::{CreateStatusRequest, RootMessage, StatusCheck};

/// Response header checked by the CORS case.
pub const CORS_ALLOW_ORIGIN: &str = "access-control-allow-origin";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, timeout, DNS failure and friends.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response arrived but its body is not the JSON we expected.
    #[error("invalid JSON body: {0}")]
    Decode(String),
}

/// One captured exchange with the backend.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Value of `Access-Control-Allow-Origin`, if the server sent it.
    pub allow_origin: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the body as `T`, mapping failure into the decode domain.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Body as a raw JSON value, retained on failing results.
    pub fn raw(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// HTTP client bound to one backend base URL
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET {base}/
    pub async fn get_root(&self) -> Result<ApiResponse, ClientError> {
        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await?;
        Self::capture(resp).await
    }

    /// GET {base}/ with an Origin header, to trigger a CORS response.
    pub async fn get_root_with_origin(&self, origin: &str) -> Result<ApiResponse, ClientError> {
        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .header("Origin", origin)
            .send()
            .await?;
        Self::capture(resp).await
    }

    /// GET {base}/status
    pub async fn list_status(&self) -> Result<ApiResponse, ClientError> {
        let resp = self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await?;
        Self::capture(resp).await
    }

    /// POST {base}/status with `{ "client_name": ... }`
    pub async fn create_status(&self, client_name: &str) -> Result<ApiResponse, ClientError> {
        let resp = self
            .client
            .post(format!("{}/status", self.base_url))
            .json(&CreateStatusRequest {
                client_name: client_name.to_string(),
            })
            .send()
            .await?;
        Self::capture(resp).await
    }

    /// POST {base}/status with an arbitrary raw body. Used by the
    /// malformed-input probes.
    pub async fn post_status_raw(
        &self,
        body: &str,
        content_type: &str,
    ) -> Result<ApiResponse, ClientError> {
        let resp = self
            .client
            .post(format!("{}/status", self.base_url))
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await?;
        Self::capture(resp).await
    }

    async fn capture(resp: reqwest::Response) -> Result<ApiResponse, ClientError> {
        let status = resp.status().as_u16();
        let allow_origin = resp
            .headers()
            .get(CORS_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = resp.text().await?;

        Ok(ApiResponse {
            status,
            allow_origin,
            body,
        })
    }
}
