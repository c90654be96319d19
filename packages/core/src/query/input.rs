//! Model query input
//!
//! A [`ModelQuery`] maps field names to [`FieldValue`]s. The value's shape is
//! decided when it is built, not when it is compiled:
//!
//! - `Scalar` - equality filter plus projection
//! - `Chain` - builder operations (filters, ordering)
//! - `Computed` - aggregate arguments handed to the server untouched
//! - `Relation` - a nested model query for a related model
//!
//! The reserved keys `_select`, `_limit` and `_paginate` live in their own
//! slots rather than among the fields.

use super::builder::Chain;
use serde_json::Value;

/// Reserved key overriding the projection
pub const SELECT_KEY: &str = "_select";
/// Reserved key carrying the row limit
pub const LIMIT_KEY: &str = "_limit";
/// Reserved key carrying the pagination arguments
pub const PAGINATE_KEY: &str = "_paginate";

/// Value attached to one field of a model query
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Chain(Chain),
    Computed(Vec<Value>),
    Relation(Box<ModelQuery>),
}

impl FieldValue {
    /// Whether a scalar holds a primitive (string, number or bool)
    pub fn is_primitive_scalar(&self) -> bool {
        matches!(
            self,
            Self::Scalar(Value::String(_) | Value::Number(_) | Value::Bool(_))
        )
    }
}

impl From<Chain> for FieldValue {
    fn from(chain: Chain) -> Self {
        Self::Chain(chain)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Aggregate field: the values are forwarded as-is under `computed`
pub fn compute<I, V>(values: I) -> FieldValue
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    FieldValue::Computed(values.into_iter().map(Into::into).collect())
}

/// Relation field: `nested` is compiled exactly like a top-level query
pub fn rel(nested: ModelQuery) -> FieldValue {
    FieldValue::Relation(Box::new(nested))
}

/// Field map for one model, plus the reserved directives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelQuery {
    fields: Vec<(String, FieldValue)>,
    select: Option<Vec<String>>,
    limit: Option<Value>,
    paginate: Option<Value>,
}

impl ModelQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an earlier value for the same name
    /// in place so declaration order is kept.
    ///
    /// The reserved names are routed to their slots: a scalar `_limit` or
    /// `_paginate` becomes the limit/paginate directive, and a `_select`
    /// array of strings becomes the projection override.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        let value = value.into();

        if let FieldValue::Scalar(scalar) = &value {
            match name.as_str() {
                LIMIT_KEY => {
                    self.limit = Some(scalar.clone());
                    return self;
                }
                PAGINATE_KEY => {
                    self.paginate = Some(scalar.clone());
                    return self;
                }
                SELECT_KEY => {
                    if let Value::Array(items) = scalar {
                        self.select = Some(
                            items
                                .iter()
                                .filter_map(|item| item.as_str().map(str::to_string))
                                .collect(),
                        );
                        return self;
                    }
                }
                _ => {}
            }
        }

        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
        self
    }

    /// Like [`ModelQuery::field`], but `None` leaves the field out entirely
    pub fn field_opt<V: Into<FieldValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Explicit projection, replacing whatever the fields would select
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: impl Into<Value>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Ask the server for a paginated answer; `args` is forwarded verbatim
    /// (typically `[per_page]` or `[per_page, page]`).
    pub fn paginate(mut self, args: impl Into<Value>) -> Self {
        self.paginate = Some(args.into());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn select_override(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    pub fn limit_value(&self) -> Option<&Value> {
        self.limit.as_ref()
    }

    pub fn paginate_value(&self) -> Option<&Value> {
        self.paginate.as_ref()
    }

    pub fn is_paginated(&self) -> bool {
        self.paginate.is_some()
    }

    /// True when there are no fields and no directives
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.select.is_none()
            && self.limit.is_none()
            && self.paginate.is_none()
    }
}
