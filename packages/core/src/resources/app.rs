//! Application resource set

use super::context::ResourceContext;
use super::resource::Resource;
use crate::models::{Account, Category, Expense, User};

/// The four cached resources of the ledger app, sharing one context
#[derive(Clone)]
pub struct AppResources {
    pub users: Resource<User>,
    pub accounts: Resource<Account>,
    pub categories: Resource<Category>,
    pub expenses: Resource<Expense>,
}

impl AppResources {
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            users: Resource::new("users", ctx.clone()),
            accounts: Resource::new("accounts", ctx.clone()),
            categories: Resource::new("categories", ctx.clone()),
            expenses: Resource::new("expenses", ctx),
        }
    }

    /// Clear every cache and the shared interaction tracker
    pub async fn reset(&self) {
        self.users.reset().await;
        self.accounts.reset().await;
        self.categories.reset().await;
        self.expenses.reset().await;
        self.users.context().tracker().reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::InMemoryTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_resources_share_context() {
        let ctx = ResourceContext::with_transport(Arc::new(InMemoryTransport::new()));
        let app = AppResources::new(ctx);

        assert_eq!(app.users.index(), "users");
        assert_eq!(app.accounts.index(), "accounts");
        assert_eq!(app.categories.index(), "categories");
        assert_eq!(app.expenses.index(), "expenses");

        app.users.context().tracker().set_error("users", "boom").await;
        assert_eq!(
            app.expenses.context().tracker().error("users").await.as_deref(),
            Some("boom")
        );

        app.reset().await;
        assert!(app.expenses.context().tracker().errors().await.is_empty());
    }
}
