//! HTTP plumbing to the storage-management backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::protocol::{LogsReply, OperationReply, RequestPayload, GET_LOGS_ENDPOINT};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid backend url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed reply from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
}

/// Action reply together with the HTTP outcome it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub http_status: u16,
    pub reply: OperationReply,
}

impl ActionResponse {
    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.http_status)
    }

    /// Success only when both the transport and the backend status agree.
    pub fn is_success(&self) -> bool {
        self.is_http_success() && self.reply.is_success()
    }
}

#[async_trait]
pub trait BackendTransport: Send + Sync {
    /// POSTs `payload` to `endpoint`. Non-2xx replies with a well-formed
    /// body are returned, not treated as errors.
    async fn post_action(
        &self,
        endpoint: &str,
        payload: &RequestPayload,
    ) -> Result<ActionResponse, TransportError>;

    async fn fetch_logs(&self) -> Result<LogsReply, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    server_url: String,
}

impl HttpTransport {
    pub fn new(server_url: impl AsRef<str>) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl AsRef<str>) -> Result<Self, TransportError> {
        let server_url = normalize_server_url(server_url.as_ref())?;
        Ok(Self { http, server_url })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.server_url, endpoint.trim_start_matches('/'))
    }
}

/// Validates the scheme and drops trailing slashes.
pub fn normalize_server_url(raw: &str) -> Result<String, TransportError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TransportError::InvalidUrl {
            url: raw.to_string(),
            reason: "server_url must start with http:// or https://".into(),
        });
    }
    Ok(trimmed.to_string())
}

async fn decode_body<T: DeserializeOwned>(
    endpoint: &str,
    res: reqwest::Response,
) -> Result<T, TransportError> {
    let body = res.bytes().await.map_err(|source| TransportError::Request {
        endpoint: endpoint.to_string(),
        source,
    })?;
    serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[async_trait]
impl BackendTransport for HttpTransport {
    async fn post_action(
        &self,
        endpoint: &str,
        payload: &RequestPayload,
    ) -> Result<ActionResponse, TransportError> {
        let url = self.endpoint_url(endpoint);
        let res = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let http_status = res.status().as_u16();
        debug!(%url, http_status, "action reply received");
        let reply: OperationReply = decode_body(endpoint, res).await?;
        Ok(ActionResponse { http_status, reply })
    }

    async fn fetch_logs(&self) -> Result<LogsReply, TransportError> {
        let url = self.endpoint_url(GET_LOGS_ENDPOINT);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: GET_LOGS_ENDPOINT.to_string(),
                source,
            })?;
        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: GET_LOGS_ENDPOINT.to_string(),
                status: status.as_u16(),
            });
        }
        decode_body(GET_LOGS_ENDPOINT, res).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
