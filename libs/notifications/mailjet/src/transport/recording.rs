//! In-memory transport that replays canned responses and records requests.

use super::{RawResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

/// Transport for tests and dry runs.
///
/// Responses are handed out in the order they were queued; an empty queue yields a
/// transport error. Clones share the same queue and request log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<RawResponse, String>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with responses queued up front
    pub fn with_responses(responses: impl IntoIterator<Item = RawResponse>) -> Self {
        Self {
            requests: Arc::default(),
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
        }
    }

    /// Queue a response
    pub async fn respond_with(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Ok(RawResponse::new(status, body)));
    }

    /// Queue a transport failure
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Get all recorded requests
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
    ) -> Result<RawResponse, TransportError> {
        self.requests.lock().await.push(RecordedRequest {
            method,
            path: path.to_string(),
            payload,
        });

        match self.responses.lock().await.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::new(message)),
            None => Err(TransportError::new("no response queued")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let transport = RecordingTransport::with_responses([
            RawResponse::new(200, "first"),
            RawResponse::new(201, "second"),
        ]);

        let first = transport
            .execute(Method::GET, "/v3/REST/campaign", None)
            .await
            .unwrap();
        let second = transport
            .execute(Method::POST, "/v3/send", Some(json!({"Subject": "hi"})))
            .await
            .unwrap();

        assert_eq!(first.body, "first");
        assert_eq!(second.status, 201);

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].payload, Some(json!({"Subject": "hi"})));
    }

    #[tokio::test]
    async fn test_queued_failure_and_empty_queue() {
        let transport = RecordingTransport::new();
        transport.fail_with("connection refused").await;

        let err = transport
            .execute(Method::GET, "/v3/REST/campaign", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));

        let err = transport
            .execute(Method::GET, "/v3/REST/campaign", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no response queued"));
        assert_eq!(transport.request_count().await, 2);
    }
}
