//! Record identity
//!
//! Every cached resource row implements [`Record`] so the cache can find it
//! again by id after a write.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Record identifier: numeric auto-increment keys or string/UUID keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(id) => write!(f, "{}", id),
            Id::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Id::Int(id)
    }
}

impl From<i32> for Id {
    fn from(id: i32) -> Self {
        Id::Int(id.into())
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Id::Str(id.to_string())
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Id::Str(id)
    }
}

impl From<Uuid> for Id {
    fn from(id: Uuid) -> Self {
        Id::Str(id.to_string())
    }
}

impl From<&Id> for Id {
    fn from(id: &Id) -> Self {
        id.clone()
    }
}

/// A row the resource layer can cache
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Identity used to match cached rows after update/destroy
    fn id(&self) -> Id;
}
