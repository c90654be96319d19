//! Per-endpoint CRUD resource
//!
//! The simpler sibling of [`Resource`](super::Resource): no query compiler,
//! just `GET`/`POST`/`PUT`/`DELETE` on `/{index}` plus a local list and
//! current record that the caller keeps in step.

use super::context::ResourceContext;
use super::pagination::{fake_pagination, Pagination};
use super::primitives::{
    create_primitive, destroy_primitive, merge_record, unwrap_record, update_primitive,
    OperationOptions, Payload,
};
use crate::error::{ResourceError, ResourceResult};
use crate::http::HttpRequest;
use crate::models::{Id, Record};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct EndpointState<T> {
    items: Vec<T>,
    current: Option<T>,
    pagination: Pagination<T>,
}

pub struct EndpointResource<T: Record> {
    index: String,
    ctx: ResourceContext,
    state: Arc<RwLock<EndpointState<T>>>,
}

impl<T: Record> Clone for EndpointResource<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            ctx: self.ctx.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Record> EndpointResource<T> {
    pub fn new(index: impl Into<String>, ctx: ResourceContext) -> Self {
        Self {
            index: index.into(),
            ctx,
            state: Arc::new(RwLock::new(EndpointState {
                items: Vec::new(),
                current: None,
                pagination: fake_pagination(&[]),
            })),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn current(&self) -> Option<T> {
        self.state.read().await.current.clone()
    }

    pub async fn pagination(&self) -> Pagination<T> {
        self.state.read().await.pagination.clone()
    }

    /// `GET /{index}`, unwrapping the `data` envelope. Does not touch the
    /// local list; use [`EndpointResource::set_all`] to keep the answer.
    pub async fn fetch(&self) -> ResourceResult<Vec<T>> {
        let response = self
            .ctx
            .transport()
            .send(HttpRequest::get(format!("/{}", self.index)))
            .await?;

        let rows = match response.body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        if rows.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(rows)
            .map_err(|e| ResourceError::decode(format!("{} listing", self.index), e))
    }

    /// `GET /{index}/{id}`
    pub async fn fetch_one(&self, id: impl Into<Id>) -> ResourceResult<T> {
        let id = id.into();
        let response = self
            .ctx
            .transport()
            .send(HttpRequest::get(format!("/{}/{}", self.index, id)))
            .await?;
        unwrap_record(response.body, &format!("{} {}", self.index, id))
    }

    /// `POST /{index}`
    pub async fn store(&self, payload: Payload) -> ResourceResult<T> {
        create_primitive(
            self.ctx.transport(),
            &self.index,
            payload,
            &OperationOptions::default(),
        )
        .await
    }

    /// `PUT /{index}/{id}` (or `POST` with `_method=PUT` for form data)
    pub async fn update(&self, id: impl Into<Id>, payload: Payload) -> ResourceResult<T> {
        let id = id.into();
        update_primitive(
            self.ctx.transport(),
            &self.index,
            &id,
            payload,
            &OperationOptions::default(),
        )
        .await
    }

    /// `DELETE /{index}/{id}`, returning the `id` the server reports
    pub async fn destroy(&self, id: impl Into<Id>) -> ResourceResult<Value> {
        let id = id.into();
        let body = destroy_primitive(
            self.ctx.transport(),
            &self.index,
            &id,
            &OperationOptions::default(),
        )
        .await?;
        tracing::info!("{}: destroyed {}", self.index, id);
        Ok(body.get("id").cloned().unwrap_or(Value::Null))
    }

    // ========== Local list ==========

    /// Shallow-merge `patch` into the current record
    pub async fn set(&self, patch: Value) -> ResourceResult<()> {
        let mut state = self.state.write().await;
        let merged = merge_record(state.current.as_ref(), &patch)?;
        state.current = Some(merged);
        Ok(())
    }

    pub async fn set_all(&self, items: Vec<T>) {
        let mut state = self.state.write().await;
        state.pagination = fake_pagination(&items);
        state.items = items;
    }

    /// Insert `item` at the front when `first_position`, else at the back
    pub async fn add(&self, item: T, first_position: bool) {
        let mut state = self.state.write().await;
        if first_position {
            state.items.insert(0, item);
        } else {
            state.items.push(item);
        }
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) {
        self.state.write().await.items.retain(|item| predicate(item));
    }

    pub async fn sync(&self, record: T, predicate: impl Fn(&T) -> bool) {
        for item in self.state.write().await.items.iter_mut() {
            if predicate(item) {
                *item = record.clone();
            }
        }
    }

    pub async fn sync_with_id(&self, record: T) {
        let id = record.id();
        self.sync(record, |item| item.id() == id).await;
    }
}
