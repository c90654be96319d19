use super::record::{Id, Record};
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cash account (caisse) expenses are drawn from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    // relationship
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user: Vec<User>,
}

impl Record for Account {
    fn id(&self) -> Id {
        Id::Int(self.id)
    }
}
