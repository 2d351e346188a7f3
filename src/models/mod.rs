//! Core data models for budget-grid
//!
//! This module contains the data structures that describe the budgeting
//! domain: categories, monthly budget lines, recorded transactions, money
//! and calendar months.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod month;
pub mod transaction;

pub use budget::BudgetEntry;
pub use category::{Category, CategoryKind, CategoryValidationError};
pub use ids::{CategoryId, TransactionId};
pub use money::{CurrencyFormat, Money, MoneyParseError};
pub use month::{Column, Month};
pub use transaction::Transaction;
