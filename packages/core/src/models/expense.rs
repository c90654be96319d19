use super::account::Account;
use super::category::Category;
use super::record::{Id, Record};
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Money leaving an account
///
/// Expense keys are UUIDs generated server-side; the relationship fields are
/// only filled when the query asked for them through `rel(...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    // relationships
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Record for Expense {
    fn id(&self) -> Id {
        Id::from(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expense_decodes_laravel_payload() {
        let expense: Expense = serde_json::from_value(json!({
            "id": "7d3c8a3e-4a61-4f43-9a52-5b0d5c1c2f10",
            "user_id": 1,
            "account_id": 2,
            "category_id": 3,
            "amount": 12.5,
            "description": null,
            "created_at": "2025-05-15T02:14:33.000000Z",
            "updated_at": "2025-05-15T02:14:33.000000Z",
            "category": {"id": 3, "name": "Food"}
        }))
        .unwrap();

        assert_eq!(expense.amount, 12.5);
        assert!(expense.description.is_none());
        assert!(expense.created_at.is_some());
        assert_eq!(expense.category.as_ref().unwrap().name, "Food");
        assert!(expense.user.is_none());
        assert_eq!(
            expense.id(),
            Id::Str("7d3c8a3e-4a61-4f43-9a52-5b0d5c1c2f10".to_string())
        );
    }

    #[test]
    fn test_expense_skips_empty_relations_when_encoding() {
        let expense = Expense {
            id: Uuid::nil(),
            user_id: 1,
            account_id: 1,
            category_id: 1,
            amount: 3.0,
            description: None,
            created_at: None,
            updated_at: None,
            user: None,
            account: None,
            category: None,
        };

        let encoded = serde_json::to_value(&expense).unwrap();
        let keys: Vec<&String> = encoded.as_object().unwrap().keys().collect();
        assert!(!keys.iter().any(|k| *k == "user" || *k == "category"));
    }
}
