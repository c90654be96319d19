//! Query Compiler
//!
//! Syntax-directed translation from [`ModelQuery`] to [`CompiledQuery`].
//! Fields are visited in declaration order:
//!
//! - primitive scalar: `where field = value` (skipped for `""`) and the field
//!   is selected
//! - computed: `computed[field] = values`
//! - relation: `rels[field] = make(nested)`
//! - chain: order nodes go to `order`; every clause or group node emits one
//!   clause entry and selects the field again
//!
//! Non-primitive scalars (`null`, arrays, objects) carry no operation and are
//! skipped.
//!
//! A field filtered by several chain clauses appears once per clause in
//! `select`. The server tolerates the duplicates and existing clients rely on
//! the exact payload, so they are kept.

use super::builder::{ChainNode, Operator, WHERE};
use super::input::{FieldValue, ModelQuery, LIMIT_KEY, PAGINATE_KEY};
use super::ir::{Clause, CompiledQuery, OrderBy, QueryMap};
use serde_json::Value;

/// Compile one model query
pub fn make(model: &ModelQuery) -> CompiledQuery {
    let mut output = CompiledQuery::default();
    let mut select: Vec<String> = Vec::new();

    for (key, value) in model.fields() {
        match value {
            FieldValue::Scalar(scalar) => {
                if !value.is_primitive_scalar() {
                    tracing::debug!("Skipping non-primitive scalar for field '{}'", key);
                    continue;
                }
                if !is_empty_string(scalar) {
                    output
                        .clauses
                        .push(Clause::condition(WHERE, key, Operator::Equal, scalar.clone()));
                }
                select.push(key.to_string());
            }
            FieldValue::Computed(values) => {
                output.computed.insert(key.to_string(), values.clone());
            }
            FieldValue::Relation(nested) => {
                output.rels.insert(key.to_string(), make(nested));
            }
            FieldValue::Chain(chain) => {
                for node in chain.nodes() {
                    match node {
                        ChainNode::Order(direction) => {
                            output.order.push(OrderBy(key.to_string(), *direction));
                        }
                        ChainNode::Clause {
                            operator, value, ..
                        } => {
                            output
                                .clauses
                                .push(Clause::condition(WHERE, key, *operator, value.clone()));
                            select.push(key.to_string());
                        }
                        ChainNode::Group { name, clauses } => {
                            let grouped = clauses
                                .iter()
                                .map(|sub| {
                                    Clause::condition(
                                        sub.name.as_str(),
                                        key,
                                        sub.operator,
                                        sub.value.clone(),
                                    )
                                })
                                .collect();
                            output.clauses.push(Clause::group(name.as_str(), grouped));
                            select.push(key.to_string());
                        }
                    }
                }
            }
        }
    }

    let select = match model.select_override() {
        Some(explicit) => Some(explicit.to_vec()),
        None if select.is_empty() => None,
        None => Some(select),
    };
    output.select = select.map(|fields| {
        fields
            .into_iter()
            .filter(|field| field != LIMIT_KEY && field != PAGINATE_KEY)
            .collect()
    });
    output.limit = model.limit_value().cloned();
    output.paginate = model.paginate_value().cloned();

    output
}

/// Compile several model queries, keyed by model name
pub fn query<I, K>(models: I) -> QueryMap
where
    I: IntoIterator<Item = (K, ModelQuery)>,
    K: Into<String>,
{
    models
        .into_iter()
        .map(|(name, model)| (name.into(), Some(make(&model))))
        .collect()
}

fn is_empty_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

#[cfg(test)]
#[path = "compiler_test.rs"]
mod compiler_test;
