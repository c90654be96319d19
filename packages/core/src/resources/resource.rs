//! Cached Resource
//!
//! A [`Resource`] wraps one REST collection (`users`, `expenses`, ...) and
//! keeps a local cache of it:
//!
//! - `items` - the last fetched listing, in server order
//! - `current` - the focused record
//! - `pagination` - server paging metadata, or a synthesized single page
//! - `query` - the default query used when `fetch` is called without one
//!
//! Reads compile a [`ModelQuery`] and go through the `/query` endpoint.
//! Writes call the CRUD primitives directly, run under a loading key, and
//! patch the cache only after the server confirms.
//!
//! # Concurrency
//!
//! Every cache access takes the state lock briefly; the lock is never held
//! across a request. Concurrent writes therefore apply in completion order
//! and the last one to finish wins for overlapping records. Two fetches in
//! flight both write the cache, the later resolution winning. There is no
//! cancellation.

use super::context::ResourceContext;
use super::pagination::{fake_pagination, Pagination};
use super::primitives::{
    create_primitive, destroy_primitive, loading_key, merge_record, update_primitive,
    with_loading_and_errors, Operation, OperationOptions, Payload,
};
use crate::error::{ResourceError, ResourceResult, NO_CURRENT_ELEMENT};
use crate::models::{Id, Record};
use crate::query::{query, ModelQuery};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Hook applied to every record entering `items` or `current`
pub type Transform<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Local cache of one resource
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub current: Option<T>,
    pub pagination: Pagination<T>,
    pub query: Option<ModelQuery>,
}

impl<T: Clone> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            pagination: fake_pagination(&[]),
            query: None,
        }
    }
}

/// Cached REST resource
pub struct Resource<T: Record> {
    index: String,
    ctx: ResourceContext,
    state: Arc<RwLock<ResourceState<T>>>,
    transform: Option<Transform<T>>,
}

impl<T: Record> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            ctx: self.ctx.clone(),
            state: self.state.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<T: Record> Resource<T> {
    /// Resource for collection `index` (also the model name in queries)
    pub fn new(index: impl Into<String>, ctx: ResourceContext) -> Self {
        Self {
            index: index.into(),
            ctx,
            state: Arc::new(RwLock::new(ResourceState::default())),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn context(&self) -> &ResourceContext {
        &self.ctx
    }

    fn apply(&self, item: T) -> T {
        match &self.transform {
            Some(transform) => transform(item),
            None => item,
        }
    }

    // ========== Snapshots ==========

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn current(&self) -> Option<T> {
        self.state.read().await.current.clone()
    }

    pub async fn pagination(&self) -> Pagination<T> {
        self.state.read().await.pagination.clone()
    }

    pub async fn query(&self) -> Option<ModelQuery> {
        self.state.read().await.query.clone()
    }

    pub async fn state(&self) -> ResourceState<T> {
        self.state.read().await.clone()
    }

    /// Drop every cached value, including the default query
    pub async fn reset(&self) {
        *self.state.write().await = ResourceState::default();
    }

    // ========== Reads ==========

    /// Default query used by `fetch(None)` / `fetch_one(None)`
    pub async fn set_query(&self, query: ModelQuery) {
        self.state.write().await.query = Some(query);
    }

    /// Fetch a listing into `items` and `pagination`.
    ///
    /// With `Some(query)` the query also becomes the default for later calls;
    /// with `None` the stored default (or an empty query) is used. A response
    /// missing `data` or the model key yields an empty list and leaves the
    /// cache untouched.
    ///
    /// A paginated query expects the paginator envelope; any other answer to
    /// it yields an empty list and leaves the cache untouched. An empty row
    /// array for an unpaginated query clears `items`, where the web client
    /// kept the stale rows.
    pub async fn fetch(&self, query_override: Option<ModelQuery>) -> ResourceResult<Vec<T>> {
        let model = match query_override {
            Some(model) => {
                self.set_query(model.clone()).await;
                model
            }
            None => self.query().await.unwrap_or_default(),
        };

        let Some(rows) = self.run_query(&model).await? else {
            return Ok(Vec::new());
        };

        let envelope = matches!(&rows, Value::Object(map) if map.contains_key("data"));
        match rows {
            Value::Array(_) if !model.is_paginated() => {
                let items: Vec<T> = self.decode(rows, "rows")?;
                let items: Vec<T> = items.into_iter().map(|item| self.apply(item)).collect();
                let mut state = self.state.write().await;
                state.pagination = fake_pagination(&items);
                state.items = items.clone();
                tracing::debug!("{}: cached {} items", self.index, items.len());
                Ok(items)
            }
            page if envelope && model.is_paginated() => {
                let mut pagination: Pagination<T> = self.decode(page, "page")?;
                pagination.data = pagination
                    .data
                    .into_iter()
                    .map(|item| self.apply(item))
                    .collect();
                let items = pagination.data.clone();
                tracing::debug!(
                    "{}: cached page {} ({} items)",
                    self.index,
                    pagination.current_page,
                    items.len()
                );
                let mut state = self.state.write().await;
                state.items = items.clone();
                state.pagination = pagination;
                Ok(items)
            }
            other => {
                tracing::warn!("{}: unexpected listing shape: {}", self.index, other);
                Ok(Vec::new())
            }
        }
    }

    /// Fetch a single record into `current`.
    ///
    /// The query (override or stored default) is limited to one row. An
    /// empty or malformed answer resolves to `Ok(None)` and leaves `current`
    /// as it was.
    pub async fn fetch_one(&self, query_override: Option<ModelQuery>) -> ResourceResult<Option<T>> {
        let model = match query_override {
            Some(model) => model,
            None => self.query().await.unwrap_or_default(),
        }
        .limit(1);

        let first = match self.run_query(&model).await? {
            Some(Value::Array(rows)) => rows.into_iter().next(),
            Some(Value::Object(mut envelope)) => match envelope.remove("data") {
                Some(Value::Array(rows)) => rows.into_iter().next(),
                _ => None,
            },
            _ => None,
        };
        let Some(first) = first else {
            return Ok(None);
        };

        let record = self.apply(self.decode::<T>(first, "record")?);
        let mut state = self.state.write().await;
        state.current = Some(record.clone());
        state.pagination = fake_pagination(&[]);
        Ok(Some(record))
    }

    /// Execute `model` and return `data[index]`, if present
    async fn run_query(&self, model: &ModelQuery) -> ResourceResult<Option<Value>> {
        let queries = query([(self.index.clone(), model.clone())]);
        let body = self.ctx.executor().exec(&queries).await?;

        let rows = match body {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Object(mut data)) => data.remove(&self.index),
                _ => None,
            },
            _ => None,
        };

        if rows.is_none() {
            tracing::warn!("{}: query response carried no rows", self.index);
        }
        Ok(rows.filter(|rows| !rows.is_null()))
    }

    fn decode<D: serde::de::DeserializeOwned>(&self, value: Value, what: &str) -> ResourceResult<D> {
        serde_json::from_value(value)
            .map_err(|e| ResourceError::decode(format!("{} {}", self.index, what), e))
    }

    // ========== Local state ==========

    /// Shallow-merge `patch` (a JSON object) into `current`
    pub async fn set_current(&self, patch: Value) -> ResourceResult<()> {
        let mut state = self.state.write().await;
        let merged = merge_record(state.current.as_ref(), &patch)?;
        state.current = Some(self.apply(merged));
        Ok(())
    }

    /// Replace `current` outright
    pub async fn select_current(&self, record: Option<T>) {
        let record = record.map(|record| self.apply(record));
        self.state.write().await.current = record;
    }

    pub async fn set_items(&self, items: Vec<T>) {
        let items = items.into_iter().map(|item| self.apply(item)).collect();
        self.state.write().await.items = items;
    }

    /// Append `item`, or prepend it when `add_first`
    pub async fn add(&self, item: T, add_first: bool) {
        let item = self.apply(item);
        let mut state = self.state.write().await;
        if add_first {
            state.items.insert(0, item);
        } else {
            state.items.push(item);
        }
    }

    /// Keep the items for which `predicate(item, position)` holds
    pub async fn filter(&self, predicate: impl Fn(&T, usize) -> bool) {
        let mut state = self.state.write().await;
        let items = std::mem::take(&mut state.items);
        state.items = items
            .into_iter()
            .enumerate()
            .filter(|(position, item)| predicate(item, *position))
            .map(|(_, item)| item)
            .collect();
    }

    /// Remove the item at `position`
    pub async fn remove(&self, position: usize) {
        self.filter(|_, i| i != position).await;
    }

    /// Replace every item matching `predicate` with `record`
    pub async fn sync(&self, record: T, predicate: impl Fn(&T) -> bool) {
        let record = self.apply(record);
        let mut state = self.state.write().await;
        for item in state.items.iter_mut() {
            if predicate(item) {
                *item = record.clone();
            }
        }
    }

    /// Replace the items sharing `record`'s id
    pub async fn sync_with_id(&self, record: T) {
        let id = record.id();
        self.sync(record, |item| item.id() == id).await;
    }

    // ========== Writes ==========

    /// `POST /{index}`; on success the record is added to `items` unless
    /// `options.sync` is off
    pub async fn create(&self, payload: Payload, options: OperationOptions) -> ResourceResult<T> {
        let key = loading_key(Operation::Create, &self.index, None);
        with_loading_and_errors(self.ctx.tracker(), &key, async {
            let created: T =
                create_primitive(self.ctx.transport(), &self.index, payload, &options).await?;

            if options.sync {
                self.add(created.clone(), options.add_first).await;
            }
            tracing::info!("{}: created {}", self.index, created.id());
            Ok(created)
        })
        .await
    }

    /// `PUT /{index}/{id}`; on success items with that id are replaced by
    /// the server's record unless `options.sync` is off
    pub async fn update(
        &self,
        id: impl Into<Id>,
        payload: Payload,
        options: OperationOptions,
    ) -> ResourceResult<T> {
        let id = id.into();
        let key = loading_key(Operation::Update, &self.index, Some(&id));
        with_loading_and_errors(self.ctx.tracker(), &key, async {
            let updated: T =
                update_primitive(self.ctx.transport(), &self.index, &id, payload, &options)
                    .await?;

            if options.sync {
                self.sync(updated.clone(), |item| item.id() == id).await;
            }
            tracing::info!("{}: updated {}", self.index, id);
            Ok(updated)
        })
        .await
    }

    /// `DELETE /{index}/{id}`; on success items with that id are dropped
    /// unless `options.sync` is off. Returns the server's answer.
    pub async fn destroy(&self, id: impl Into<Id>, options: OperationOptions) -> ResourceResult<Value> {
        let id = id.into();
        let key = loading_key(Operation::Destroy, &self.index, Some(&id));
        with_loading_and_errors(self.ctx.tracker(), &key, async {
            let deleted = destroy_primitive(self.ctx.transport(), &self.index, &id, &options).await?;

            if options.sync {
                self.filter(|item, _| item.id() != id).await;
            }
            tracing::info!("{}: destroyed {}", self.index, id);
            Ok(deleted)
        })
        .await
    }

    /// [`Resource::update`] on the current record
    pub async fn update_current(&self, payload: Payload, options: OperationOptions) -> ResourceResult<T> {
        let id = self.require_current().await?;
        self.update(id, payload, options).await
    }

    /// [`Resource::destroy`] on the current record
    pub async fn destroy_current(&self, options: OperationOptions) -> ResourceResult<Value> {
        let id = self.require_current().await?;
        self.destroy(id, options).await
    }

    async fn require_current(&self) -> ResourceResult<Id> {
        if let Some(current) = self.state.read().await.current.as_ref() {
            return Ok(current.id());
        }
        self.ctx
            .tracker()
            .set_error(&self.index, NO_CURRENT_ELEMENT)
            .await;
        Err(ResourceError::no_current_element(&self.index))
    }

    // ========== Loading ==========

    /// Whether `operation` on `id` is in flight; without an id, looks at the
    /// current record
    pub async fn loading(&self, operation: Operation, id: Option<&Id>) -> bool {
        match id {
            Some(id) => {
                let key = loading_key(operation, &self.index, Some(id));
                self.ctx.tracker().is_loading(&key).await
            }
            None => self.loading_current(operation).await,
        }
    }

    /// Whether `operation` on the current record is in flight. False when
    /// there is no current record.
    pub async fn loading_current(&self, operation: Operation) -> bool {
        let Some(id) = self.current().await.map(|current| current.id()) else {
            return false;
        };
        let key = loading_key(operation, &self.index, Some(&id));
        self.ctx.tracker().is_loading(&key).await
    }

    /// Last error recorded for `operation` (on `id`, when given)
    pub async fn error(&self, operation: Operation, id: Option<&Id>) -> Option<String> {
        let key = loading_key(operation, &self.index, id);
        self.ctx.tracker().error(&key).await
    }
}

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;
