//! Transport seam between the translation layer and the wire.
//!
//! The translation layer hands a method, a path relative to the API root and an optional
//! JSON payload to a [`Transport`], and gets back the status code and raw body. Everything
//! about connections, authentication and timeouts stays behind this trait.

pub mod http;
pub mod recording;

pub use http::HttpTransport;
pub use recording::{RecordedRequest, RecordingTransport};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Status code and unparsed body of one round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Opaque failure raised by a transport. Surfaced to callers as-is.
#[derive(Debug, Error)]
#[error("transport error: {source}")]
pub struct TransportError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

/// Executes one request against the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
    ) -> Result<RawResponse, TransportError>;
}
