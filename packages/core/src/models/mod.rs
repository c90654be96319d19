//! Data Models
//!
//! Records served by the ledger API, plus the [`Record`] identity trait the
//! resource cache relies on.

pub mod account;
pub mod category;
pub mod expense;
pub mod record;
pub mod user;

pub use account::Account;
pub use category::Category;
pub use expense::Expense;
pub use record::{Id, Record};
pub use user::User;
