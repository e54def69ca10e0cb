//! Mini Compass Client Library
//!
//! HTTP client for the Mini Compass collections/documents REST API. Read
//! operations return a rectangular [`DocumentSet`]; write operations report
//! success as a boolean or inserted id.

pub mod blocking;
mod client;
pub mod telemetry;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use minicompass_core::{Cell, ColumnTemplate, Config, DocumentSet, InvalidArgument};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True when the request never produced a response body
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Request(_) | ClientError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
