//! Transaction model
//!
//! Recorded transactions are the raw material for "actual" spending. Amounts
//! are kept from the category's side of the ledger: money spent in an
//! expense category is positive, money received in an income category is
//! negative.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;
use super::month::Month;

/// A recorded transaction against one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// The category this transaction is booked to
    pub category_id: CategoryId,

    pub date: NaiveDate,

    /// Category-side amount (spending positive, income negative)
    pub amount: Money,

    #[serde(default)]
    pub memo: String,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(category_id: CategoryId, date: NaiveDate, amount: Money) -> Self {
        Self {
            id: TransactionId::new(),
            category_id,
            date,
            amount,
            memo: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Check whether this transaction falls in the given year and month
    pub fn is_in(&self, year: i32, month: Month) -> bool {
        self.date.year() == year && self.date.month() == u32::from(month.number())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.amount)?;
        if !self.memo.is_empty() {
            write!(f, " ({})", self.memo)?;
        }
        Ok(())
    }
}
