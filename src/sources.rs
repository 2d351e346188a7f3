//! Collaborator interfaces of the budget engine
//!
//! The engine never reads files or talks to a ledger directly. It is handed
//! a [`CategorySource`] to enumerate categories, a [`BudgetStore`] to read and
//! write persisted budget amounts, and an [`ActualsSource`] for real
//! transaction totals. All calls are synchronous.

use crate::error::BudgetResult;
use crate::models::{CategoryId, CategoryKind, Money, Month};

/// One category as enumerated by a [`CategorySource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: CategoryId,
    /// Short (non-qualified) name
    pub name: String,
    pub kind: CategoryKind,
    /// Nesting depth within its kind's tree; top-level categories are 0
    pub depth: usize,
    /// True if the category has sub-categories
    pub is_aggregate: bool,
    pub currency: String,
}

/// Enumerates active, non-hidden Income and Expense categories
pub trait CategorySource {
    /// Return every visible category, in pre-order within each kind.
    ///
    /// The result must be stable for the duration of one tree build.
    fn iterate(&self) -> BudgetResult<Vec<CategoryEntry>>;
}

/// Persisted monthly budget amounts for one budget
pub trait BudgetStore {
    /// Read the persisted amount, or `None` if no record exists
    fn read_amount(
        &self,
        category: CategoryId,
        year: i32,
        month: Month,
    ) -> BudgetResult<Option<Money>>;

    /// Create or update the record for this category and month
    fn write_amount(
        &self,
        category: CategoryId,
        year: i32,
        month: Month,
        amount: Money,
    ) -> BudgetResult<()>;

    /// Persist any buffered writes
    fn flush(&self) -> BudgetResult<()> {
        Ok(())
    }
}

/// Monthly actual totals returned by an [`ActualsSource`]
///
/// Months outside the requested range, or missing from the source's answer,
/// read as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualTotals {
    start: Month,
    values: Vec<Money>,
}

impl ActualTotals {
    pub fn new(start: Month, values: Vec<Money>) -> Self {
        Self { start, values }
    }

    /// Totals of zero for every month
    pub fn empty(start: Month) -> Self {
        Self::new(start, Vec::new())
    }

    /// The raw actual total for `month`
    pub fn get(&self, month: Month) -> Money {
        month
            .number()
            .checked_sub(self.start.number())
            .and_then(|offset| self.values.get(offset as usize))
            .copied()
            .unwrap_or_default()
    }
}

/// Real transaction totals per category and month
pub trait ActualsSource {
    /// Totals for `count` consecutive months starting at `start`.
    ///
    /// Values are signed minor units from the category's side: spending in
    /// an expense category is positive, income received is negative.
    fn totals_for(
        &self,
        category: CategoryId,
        year: i32,
        start: Month,
        count: u8,
    ) -> BudgetResult<ActualTotals>;
}
