//! Loading and error tracking
//!
//! Keeps, per loading key, whether an operation is in flight and the last
//! error it produced. Keys look like `update_expenses_12`; see
//! [`loading_key`](super::primitives::loading_key).
//!
//! The tracker is shared through [`ResourceContext`](super::ResourceContext)
//! instead of living in a global, so tests can build a fresh one and
//! [`reset`](InteractionTracker::reset) it between cases.

use std::collections::HashMap;
use std::fmt::Display;
use tokio::sync::RwLock;

/// Shared in-flight/error state for tracked operations
#[derive(Debug, Default)]
pub struct InteractionTracker {
    status: RwLock<HashMap<String, bool>>,
    errors: RwLock<HashMap<String, String>>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` in flight and clear its previous error
    pub async fn start(&self, key: &str) {
        self.status.write().await.insert(key.to_string(), true);
        self.errors.write().await.remove(key);
    }

    /// Mark `key` finished
    pub async fn stop(&self, key: &str) {
        self.status.write().await.insert(key.to_string(), false);
    }

    /// Record a failure of `key`
    pub async fn catch_error(&self, key: &str, error: &impl Display) {
        tracing::warn!("Operation '{}' failed: {}", key, error);
        self.set_error(key, error.to_string()).await;
    }

    /// Record an error message directly
    pub async fn set_error(&self, key: &str, message: impl Into<String>) {
        self.errors
            .write()
            .await
            .insert(key.to_string(), message.into());
    }

    /// Whether `key` is in flight. Unknown keys are not.
    pub async fn is_loading(&self, key: &str) -> bool {
        self.status.read().await.get(key).copied().unwrap_or(false)
    }

    /// Last error recorded for `key`
    pub async fn error(&self, key: &str) -> Option<String> {
        self.errors.read().await.get(key).cloned()
    }

    /// Snapshot of every recorded error
    pub async fn errors(&self) -> HashMap<String, String> {
        self.errors.read().await.clone()
    }

    /// Forget all statuses and errors
    pub async fn reset(&self) {
        self.status.write().await.clear();
        self.errors.write().await.clear();
    }
}
