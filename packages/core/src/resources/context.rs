//! Shared resource context
//!
//! Everything a resource needs from the outside world: the transport, the
//! query executor bound to it, and the interaction tracker. Built once and
//! cloned into every resource (all members are reference-counted).

use super::tracker::InteractionTracker;
use crate::config::ClientConfig;
use crate::error::{ResourceError, ResourceResult};
use crate::http::HttpTransport;
use crate::query::QueryExecutor;
use std::sync::Arc;

#[derive(Clone)]
pub struct ResourceContext {
    transport: Arc<dyn HttpTransport>,
    executor: QueryExecutor,
    tracker: Arc<InteractionTracker>,
    config: ClientConfig,
}

impl ResourceContext {
    /// Context over `transport` with a validated `config`
    pub fn new(transport: Arc<dyn HttpTransport>, config: ClientConfig) -> ResourceResult<Self> {
        config.validate().map_err(ResourceError::invalid_config)?;
        Ok(Self {
            executor: QueryExecutor::from_config(transport.clone(), &config),
            transport,
            tracker: Arc::new(InteractionTracker::new()),
            config,
        })
    }

    /// Context over `transport` with default configuration
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        let config = ClientConfig::default();
        Self {
            executor: QueryExecutor::from_config(transport.clone(), &config),
            transport,
            tracker: Arc::new(InteractionTracker::new()),
            config,
        }
    }

    /// Context talking HTTP to `config.base_url`
    #[cfg(feature = "http-client")]
    pub fn from_config(config: ClientConfig) -> ResourceResult<Self> {
        let transport = crate::http::ReqwestTransport::new(&config)?;
        Self::new(Arc::new(transport), config)
    }

    /// Replace the tracker, e.g. to share one between contexts
    pub fn with_tracker(mut self, tracker: Arc<InteractionTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::InMemoryTransport;

    #[test]
    fn test_new_validates_config() {
        let transport = Arc::new(InMemoryTransport::new());
        let config = ClientConfig {
            query_path: "query".into(),
            ..ClientConfig::default()
        };

        let result = ResourceContext::new(transport, config);
        assert!(matches!(result, Err(ResourceError::InvalidConfig(_))));
    }

    #[test]
    fn test_executor_follows_config() {
        let transport = Arc::new(InMemoryTransport::new());
        let config = ClientConfig {
            query_path: "/api/query".into(),
            ..ClientConfig::default()
        };

        let ctx = ResourceContext::new(transport, config).unwrap();
        assert_eq!(ctx.executor().path(), "/api/query");
    }

    #[tokio::test]
    async fn test_shared_tracker() {
        let tracker = Arc::new(InteractionTracker::new());
        let a = ResourceContext::with_transport(Arc::new(InMemoryTransport::new()))
            .with_tracker(tracker.clone());
        let b = ResourceContext::with_transport(Arc::new(InMemoryTransport::new()))
            .with_tracker(tracker.clone());

        a.tracker().start("create_users").await;
        assert!(b.tracker().is_loading("create_users").await);
    }
}
