//! Resource layer
//!
//! Cached resources driven by the query DSL for reads and plain CRUD calls
//! for writes, the simpler per-endpoint variant, and the shared context and
//! interaction tracker both report into.

pub mod app;
pub mod context;
pub mod endpoint;
pub mod pagination;
pub mod primitives;
pub mod resource;
pub mod tracker;

pub use app::AppResources;
pub use context::ResourceContext;
pub use endpoint::EndpointResource;
pub use pagination::{fake_pagination, Pagination, PaginationLink};
pub use primitives::{
    create_primitive, destroy_primitive, loading_key, update_primitive, with_loading_and_errors,
    Operation, OperationOptions, Payload,
};
pub use resource::{Resource, ResourceState, Transform};
pub use tracker::InteractionTracker;
