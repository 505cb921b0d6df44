//! Access token retrieval
//!
//! The backend exposes `POST /get_token` taking `{"username": ...}` and
//! answering `{"token": ...}`. Anything other than a 2xx response carrying a
//! non-empty token is treated as a connection failure.

use crate::error::{Result, VideoRoomError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Path of the token endpoint relative to the server URL
pub const TOKEN_PATH: &str = "/get_token";

/// Source of room access tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Request a token for the given identity
    async fn fetch_token(&self, identity: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Token provider backed by the HTTP token endpoint
#[derive(Debug, Clone)]
pub struct HttpTokenProvider {
    /// Full token endpoint URL
    endpoint: String,
    /// Reqwest HTTP client
    client: reqwest::Client,
}

impl HttpTokenProvider {
    /// Create a provider for the server at `server_url`
    ///
    /// `server_url` must start with `http://` or `https://`; the token path is
    /// appended to it.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        if server_url.is_empty() {
            return Err(VideoRoomError::InvalidConfiguration {
                field: "server_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(VideoRoomError::InvalidConfiguration {
                field: "server_url".to_string(),
                reason: format!("must start with http:// or https://, got: {}", server_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VideoRoomError::Initialization {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), TOKEN_PATH),
            client,
        })
    }

    /// Full token endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TokenProvider for HttpTokenProvider {
    async fn fetch_token(&self, identity: &str) -> Result<String> {
        debug!("Requesting token for {} from {}", identity, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&TokenRequest { username: identity })
            .send()
            .await
            .map_err(|e| VideoRoomError::TokenRequest {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VideoRoomError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| VideoRoomError::TokenRequest {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let parsed: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| VideoRoomError::MalformedTokenResponse {
                reason: e.to_string(),
            })?;

        if parsed.token.is_empty() {
            return Err(VideoRoomError::MalformedTokenResponse {
                reason: "token is empty".to_string(),
            });
        }

        info!("🔑 Received token for {}", identity);
        Ok(parsed.token)
    }
}
