//! Compiled query IR
//!
//! The normalized shape the server's query interpreter consumes. Encoding is
//! sparse: empty sections are left out of the JSON entirely. `select`,
//! `limit` and `paginate` are optional and appear whenever they were set,
//! even when an explicit `_select` is an empty list.

use super::builder::{Direction, Operator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `[field, operator, value]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition(pub String, pub Operator, pub Value);

/// Body of a clause: a single condition or a group of nested clauses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClauseValue {
    Condition(Condition),
    Group(Vec<Clause>),
}

/// `{ "name": "where", "value": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub name: String,
    pub value: ClauseValue,
}

impl Clause {
    pub fn condition(
        name: impl Into<String>,
        field: impl Into<String>,
        operator: Operator,
        value: Value,
    ) -> Self {
        Self {
            name: name.into(),
            value: ClauseValue::Condition(Condition(field.into(), operator, value)),
        }
    }

    pub fn group(name: impl Into<String>, clauses: Vec<Clause>) -> Self {
        Self {
            name: name.into(),
            value: ClauseValue::Group(clauses),
        }
    }
}

/// `[field, direction]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy(pub String, pub Direction);

/// Compiled form of one model query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clauses: Vec<Clause>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub computed: BTreeMap<String, Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rels: BTreeMap<String, CompiledQuery>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<OrderBy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginate: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
}

impl CompiledQuery {
    /// True when no section would be serialized
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
            && self.computed.is_empty()
            && self.select.is_none()
            && self.rels.is_empty()
            && self.order.is_empty()
            && self.paginate.is_none()
            && self.limit.is_none()
    }
}

/// Compiled queries keyed by model name. `None` entries are dropped on send.
pub type QueryMap = BTreeMap<String, Option<CompiledQuery>>;
