use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use std::time::Duration;

use crate::Result;

/// One HTTP request as built by the client
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    /// JSON text; `None` for bodiless requests
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Transport performs one request/response round trip
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport. Status codes are reported, never treated as errors.
pub struct ReqwestTransport {
    client: HttpClient,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
        }
    }

    pub fn with_options(insecure_skip_verify: bool, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json");

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json; charset=UTF-8")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status,
            body_len = body.len(),
            "Round trip complete"
        );

        Ok(TransportResponse { status, body })
    }
}
