//! Query Executor
//!
//! Encodes a [`QueryMap`] and posts it to the query endpoint as
//! `{"query": "<json string>"}`. The response body is handed back untouched;
//! unwrapping per model happens in the resource layer.

use super::ir::{CompiledQuery, QueryMap};
use crate::config::{ClientConfig, DEFAULT_QUERY_PATH};
use crate::error::{ResourceError, ResourceResult};
use crate::http::{HttpRequest, HttpTransport};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Sends compiled queries to the server
#[derive(Clone)]
pub struct QueryExecutor {
    transport: Arc<dyn HttpTransport>,
    path: String,
}

impl QueryExecutor {
    /// Executor posting to the default `/query` endpoint
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_path(transport, DEFAULT_QUERY_PATH)
    }

    pub fn with_path(transport: Arc<dyn HttpTransport>, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &ClientConfig) -> Self {
        Self::with_path(transport, config.query_path.clone())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request body for `queries`; `None` entries are dropped
    pub fn encode(queries: &QueryMap) -> ResourceResult<Value> {
        let present: BTreeMap<&str, &CompiledQuery> = queries
            .iter()
            .filter_map(|(model, compiled)| compiled.as_ref().map(|c| (model.as_str(), c)))
            .collect();

        let encoded = serde_json::to_string(&present)
            .map_err(|e| ResourceError::serialization(format!("query payload: {}", e)))?;

        Ok(json!({ "query": encoded }))
    }

    /// POST the queries and return the raw response body
    pub async fn exec(&self, queries: &QueryMap) -> ResourceResult<Value> {
        let body = Self::encode(queries)?;
        tracing::debug!("POST {} {}", self.path, body["query"]);

        let response = self
            .transport
            .send(HttpRequest::post(self.path.clone()).json(body))
            .await?;

        Ok(response.body)
    }

    /// Alias of [`QueryExecutor::exec`]
    pub async fn execute(&self, queries: &QueryMap) -> ResourceResult<Value> {
        self.exec(queries).await
    }
}
