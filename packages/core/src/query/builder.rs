//! Query Expression Builder
//!
//! A [`Chain`] is the ordered list of operations attached to one field. It is
//! persistent: every builder method borrows the receiver and returns a new
//! chain with one more node, so a chain handle can be reused as the common
//! prefix of several queries without the branches seeing each other's nodes.
//!
//! ```rust
//! use ledger_core::query::{after, Direction};
//!
//! let recent = after("2025-01-01").before("2025-02-01").order(Direction::Desc);
//! assert_eq!(recent.len(), 3);
//! ```
//!
//! Nodes apply conjunctively in declaration order. `between` is the one
//! builder that produces a grouped node: two sub-clauses on the same field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Clause name used for every filter the builder emits
pub const WHERE: &str = "where";

/// Comparison operator, serialized as its wire spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
    #[serde(rename = "EXISTS")]
    Exists,
    #[serde(rename = "NOT EXISTS")]
    NotExists,
    #[serde(rename = "BETWEEN")]
    Between,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::Like => "like",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Exists => "EXISTS",
            Self::NotExists => "NOT EXISTS",
            Self::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown sort direction: {}", other)),
        }
    }
}

/// One member of a grouped clause
#[derive(Debug, Clone, PartialEq)]
pub struct SubClause {
    pub name: String,
    pub operator: Operator,
    pub value: Value,
}

/// A single chain entry
#[derive(Debug, Clone, PartialEq)]
pub enum ChainNode {
    /// Sort on the chain's field
    Order(Direction),
    /// `field <operator> value`
    Clause {
        name: String,
        operator: Operator,
        value: Value,
    },
    /// Several conditions on the same field, emitted as one clause entry
    Group { name: String, clauses: Vec<SubClause> },
}

impl ChainNode {
    fn clause(operator: Operator, value: Value) -> Self {
        Self::Clause {
            name: WHERE.to_string(),
            operator,
            value,
        }
    }
}

/// Persistent, append-only list of operations for one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    nodes: Vec<ChainNode>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// New chain with `node` appended; `self` is left as it was
    pub fn push(&self, node: ChainNode) -> Chain {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(node);
        Chain { nodes }
    }

    fn clause(&self, operator: Operator, value: Value) -> Chain {
        self.push(ChainNode::clause(operator, value))
    }

    pub fn order(&self, direction: Direction) -> Chain {
        self.push(ChainNode::Order(direction))
    }

    pub fn equal(&self, value: impl Into<Value>) -> Chain {
        self.clause(Operator::Equal, value.into())
    }

    pub fn not_equal(&self, value: impl Into<Value>) -> Chain {
        self.clause(Operator::NotEqual, value.into())
    }

    pub fn greater_than(&self, value: impl Into<Value>) -> Chain {
        self.clause(Operator::GreaterThan, value.into())
    }

    pub fn less_than(&self, value: impl Into<Value>) -> Chain {
        self.clause(Operator::LessThan, value.into())
    }

    pub fn greater_than_or_equal(&self, value: impl Into<Value>) -> Chain {
        self.clause(Operator::GreaterThanOrEqual, value.into())
    }

    pub fn less_than_or_equal(&self, value: impl Into<Value>) -> Chain {
        self.clause(Operator::LessThanOrEqual, value.into())
    }

    /// Substring match: the value is wrapped as `%value%`. Strings are
    /// wrapped as-is, other values by their JSON text.
    pub fn like(&self, value: impl Into<Value>) -> Chain {
        let pattern = match value.into() {
            Value::String(text) => text,
            other => other.to_string(),
        };
        self.clause(Operator::Like, Value::String(format!("%{}%", pattern)))
    }

    /// Alias of [`Chain::less_than`]
    pub fn before(&self, value: impl Into<Value>) -> Chain {
        self.less_than(value)
    }

    /// Alias of [`Chain::greater_than`]
    pub fn after(&self, value: impl Into<Value>) -> Chain {
        self.greater_than(value)
    }

    /// Exclusive range: `field > low AND field < high`, grouped
    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> Chain {
        self.push(ChainNode::Group {
            name: WHERE.to_string(),
            clauses: vec![
                SubClause {
                    name: WHERE.to_string(),
                    operator: Operator::GreaterThan,
                    value: low.into(),
                },
                SubClause {
                    name: WHERE.to_string(),
                    operator: Operator::LessThan,
                    value: high.into(),
                },
            ],
        })
    }

    /// Single `BETWEEN` clause carrying `[start, end]`
    pub fn between_dates(&self, start: impl Into<Value>, end: impl Into<Value>) -> Chain {
        self.clause(Operator::Between, Value::Array(vec![start.into(), end.into()]))
    }

    pub fn in_values<I, V>(&self, values: I) -> Chain
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.clause(
            Operator::In,
            Value::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn not_in<I, V>(&self, values: I) -> Chain
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.clause(
            Operator::NotIn,
            Value::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn is_null(&self) -> Chain {
        self.clause(Operator::IsNull, Value::Null)
    }

    pub fn is_not_null(&self) -> Chain {
        self.clause(Operator::IsNotNull, Value::Null)
    }

    /// Subquery existence; the subquery is passed through untouched
    pub fn exists(&self, subquery: impl Into<Value>) -> Chain {
        self.clause(Operator::Exists, subquery.into())
    }

    pub fn not_exists(&self, subquery: impl Into<Value>) -> Chain {
        self.clause(Operator::NotExists, subquery.into())
    }
}

// Free functions start a fresh chain.

pub fn order(direction: Direction) -> Chain {
    Chain::new().order(direction)
}

pub fn equal(value: impl Into<Value>) -> Chain {
    Chain::new().equal(value)
}

pub fn not_equal(value: impl Into<Value>) -> Chain {
    Chain::new().not_equal(value)
}

pub fn greater_than(value: impl Into<Value>) -> Chain {
    Chain::new().greater_than(value)
}

pub fn less_than(value: impl Into<Value>) -> Chain {
    Chain::new().less_than(value)
}

pub fn greater_than_or_equal(value: impl Into<Value>) -> Chain {
    Chain::new().greater_than_or_equal(value)
}

pub fn less_than_or_equal(value: impl Into<Value>) -> Chain {
    Chain::new().less_than_or_equal(value)
}

pub fn like(value: impl Into<Value>) -> Chain {
    Chain::new().like(value)
}

pub fn before(value: impl Into<Value>) -> Chain {
    Chain::new().before(value)
}

pub fn after(value: impl Into<Value>) -> Chain {
    Chain::new().after(value)
}

pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Chain {
    Chain::new().between(low, high)
}

pub fn between_dates(start: impl Into<Value>, end: impl Into<Value>) -> Chain {
    Chain::new().between_dates(start, end)
}

pub fn in_values<I, V>(values: I) -> Chain
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Chain::new().in_values(values)
}

pub fn not_in<I, V>(values: I) -> Chain
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Chain::new().not_in(values)
}

pub fn is_null() -> Chain {
    Chain::new().is_null()
}

pub fn is_not_null() -> Chain {
    Chain::new().is_not_null()
}

pub fn exists(subquery: impl Into<Value>) -> Chain {
    Chain::new().exists(subquery)
}

pub fn not_exists(subquery: impl Into<Value>) -> Chain {
    Chain::new().not_exists(subquery)
}
