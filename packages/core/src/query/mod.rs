//! Query DSL
//!
//! Fluent builders produce per-field [`Chain`]s, a [`ModelQuery`] collects
//! them per model, [`make`] compiles a model query into the normalized
//! [`CompiledQuery`] IR, and [`QueryExecutor`] ships a batch of compiled
//! queries to the server's `/query` endpoint.
//!
//! ```rust
//! use ledger_core::query::{between, compute, make, order, rel, Direction, ModelQuery};
//!
//! let expenses = ModelQuery::new()
//!     .field("user_id", 3)
//!     .field("amount", between(10, 500))
//!     .field("created_at", order(Direction::Desc))
//!     .field("total", compute(["sum", "amount"]))
//!     .field("category", rel(ModelQuery::new().field("name", "")))
//!     .paginate(serde_json::json!([15]));
//!
//! let ir = make(&expenses);
//! assert_eq!(ir.clauses.len(), 2);
//! assert!(ir.rels.contains_key("category"));
//! ```

pub mod builder;
pub mod compiler;
pub mod executor;
pub mod input;
pub mod ir;

pub use builder::{
    after, before, between, between_dates, equal, exists, greater_than, greater_than_or_equal,
    in_values, is_not_null, is_null, less_than, less_than_or_equal, like, not_equal, not_exists,
    not_in, order, Chain, ChainNode, Direction, Operator, SubClause, WHERE,
};
pub use compiler::{make, query};
pub use executor::QueryExecutor;
pub use input::{compute, rel, FieldValue, ModelQuery, LIMIT_KEY, PAGINATE_KEY, SELECT_KEY};
pub use ir::{Clause, ClauseValue, CompiledQuery, Condition, OrderBy, QueryMap};
