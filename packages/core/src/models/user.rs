use super::account::Account;
use super::expense::Expense;
use super::record::{Id, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    // relationships
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Account>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expenses: Vec<Expense>,
}

impl Record for User {
    fn id(&self) -> Id {
        Id::Str(self.id.clone())
    }
}
