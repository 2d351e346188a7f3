//! Budget line model
//!
//! A budget is a named set of monthly amounts per category. Each persisted
//! line covers exactly one category for one calendar month.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;
use super::month::Month;

/// One persisted budget amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Name of the budget this line belongs to
    pub budget: String,

    pub category_id: CategoryId,

    pub year: i32,

    pub month: Month,

    /// Budgeted amount in minor units
    pub amount: Money,
}

impl BudgetEntry {
    pub fn new(
        budget: impl Into<String>,
        category_id: CategoryId,
        year: i32,
        month: Month,
        amount: Money,
    ) -> Self {
        Self {
            budget: budget.into(),
            category_id,
            year,
            month,
            amount,
        }
    }
}

impl fmt::Display for BudgetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{:02}: {}",
            self.budget,
            self.year,
            self.month.number(),
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let entry = BudgetEntry::new(
            "Household",
            CategoryId::new(),
            2024,
            Month::new(2).unwrap(),
            Money::from_minor(15000),
        );
        assert_eq!(entry.to_string(), "Household 2024-02: $150.00");
    }

    #[test]
    fn test_serialization() {
        let entry = BudgetEntry::new(
            "Budget",
            CategoryId::new(),
            2024,
            Month::DECEMBER,
            Money::from_minor(-500),
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: BudgetEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
