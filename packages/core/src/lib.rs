//! Ledger Core Client Layer
//!
//! This crate provides the query DSL, the query executor and the cached
//! resource layer a ledger front end uses to talk to its REST API.
//!
//! # Architecture
//!
//! - **Query DSL**: persistent expression chains compiled into a sparse JSON IR
//! - **Single query endpoint**: every read is one `POST /query` carrying `{query: "<json>"}`
//! - **Direct CRUD for writes**: `POST`/`PUT`/`DELETE` on `/{index}`, cache patched on success
//! - **Explicit context**: transport, tracker and config are passed in, never global
//!
//! # Modules
//!
//! - [`query`] - Expression builder, compiler (`make`/`query`) and executor
//! - [`resources`] - Cached resources, CRUD primitives and interaction tracking
//! - [`models`] - Ledger records (User, Account, Category, Expense)
//! - [`http`] - Transport seam with reqwest and in-memory implementations
//! - [`config`] - Client configuration

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod query;
pub mod resources;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ResourceError, ResourceResult};
pub use http::{HttpTransport, InMemoryTransport, TransportError};
pub use models::*;
pub use query::{make, query, ModelQuery, QueryExecutor};
pub use resources::{
    AppResources, EndpointResource, InteractionTracker, Operation, OperationOptions, Payload,
    Resource, ResourceContext,
};
