//! In-memory transport
//!
//! Serves queued responses in FIFO order and keeps a log of every request it
//! was asked to send. Useful for offline wiring and for tests that need to
//! assert on what went over the wire.

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Transport backed by a queue of canned replies
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    replies: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response. Non-2xx statuses are surfaced as
    /// [`TransportError::Status`] when served.
    pub async fn push_response(&self, response: HttpResponse) {
        self.replies.lock().await.push_back(Ok(response));
    }

    /// Queue a `200 OK` with the given JSON body
    pub async fn push_json(&self, body: Value) {
        self.push_response(HttpResponse::ok(body)).await;
    }

    /// Queue a transport failure
    pub async fn push_error(&self, error: TransportError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Every request sent so far, oldest first
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    /// Most recent request, if any
    pub async fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Number of replies still queued
    pub async fn pending_replies(&self) -> usize {
        self.replies.lock().await.len()
    }
}

#[async_trait]
impl HttpTransport for InMemoryTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!("InMemoryTransport {} {}", request.method, request.path);
        let path = request.path.clone();
        self.requests.lock().await.push(request);

        let reply = self.replies.lock().await.pop_front().ok_or_else(|| {
            TransportError::network(format!("no response queued for {}", path))
        })?;

        let response = reply?;
        if !response.is_success() {
            return Err(TransportError::status(
                response.status,
                response.body.to_string(),
            ));
        }
        Ok(response)
    }
}
