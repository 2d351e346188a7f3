//! Grid rows of the category tree

use serde::Serialize;
use std::fmt;

use crate::models::{CategoryId, CategoryKind, Column, Money, Month};

/// Identity of a grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKey {
    /// The Income − Expenses row
    Overall,
    /// The Income subtotal row
    Income,
    /// The Expenses subtotal row
    Expenses,
    Category(CategoryId),
}

impl NodeKey {
    pub fn category_id(&self) -> Option<CategoryId> {
        match self {
            NodeKey::Category(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Overall => write!(f, "overall"),
            NodeKey::Income => write!(f, "income"),
            NodeKey::Expenses => write!(f, "expenses"),
            NodeKey::Category(id) => write!(f, "{}", id),
        }
    }
}

/// One row of the budget grid
///
/// Month values, the year total and the changed flags are only ever written
/// by [`CategoryTree`](super::CategoryTree), which keeps roll-ups in step.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub key: NodeKey,
    pub name: String,
    /// Indentation level: 0 for the overall row, 1 for the subtotals
    pub depth: usize,
    /// Row this one rolls up into; `None` only for the overall row
    pub parent: Option<usize>,
    pub kind: CategoryKind,
    /// Roll-up rows are computed from their children and never edited
    pub is_aggregate: bool,
    pub currency: String,
    pub(crate) months: [Money; 12],
    pub(crate) year_total: Money,
    pub(crate) dirty: [bool; 12],
}

impl CategoryNode {
    /// Create a row for a category
    pub fn category(
        id: CategoryId,
        name: impl Into<String>,
        kind: CategoryKind,
        depth: usize,
        parent: usize,
        is_aggregate: bool,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            key: NodeKey::Category(id),
            name: name.into(),
            depth,
            parent: Some(parent),
            kind,
            is_aggregate,
            currency: currency.into(),
            months: [Money::zero(); 12],
            year_total: Money::zero(),
            dirty: [false; 12],
        }
    }

    /// Create one of the synthetic total rows
    pub fn total(
        key: NodeKey,
        name: impl Into<String>,
        kind: CategoryKind,
        depth: usize,
        parent: Option<usize>,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            depth,
            parent,
            kind,
            is_aggregate: true,
            currency: String::new(),
            months: [Money::zero(); 12],
            year_total: Money::zero(),
            dirty: [false; 12],
        }
    }

    pub fn month_value(&self, month: Month) -> Money {
        self.months[month.index()]
    }

    pub fn year_total(&self) -> Money {
        self.year_total
    }

    /// Value shown in a grid column
    pub fn value(&self, column: Column) -> Money {
        match column {
            Column::Month(month) => self.month_value(month),
            Column::Total => self.year_total,
        }
    }

    /// All twelve month values, January first
    pub fn months(&self) -> &[Money; 12] {
        &self.months
    }

    /// True if the month holds an edit not yet written back
    pub fn is_changed(&self, month: Month) -> bool {
        self.dirty[month.index()]
    }

    pub fn has_changes(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.key.category_id()
    }

    /// Leaf category rows are the only editable rows
    pub fn is_editable(&self) -> bool {
        !self.is_aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rows_are_zero() {
        let node = CategoryNode::category(
            CategoryId::new(),
            "Rent",
            CategoryKind::Expense,
            2,
            1,
            false,
            "USD",
        );
        assert!(node.is_editable());
        assert!(node.year_total().is_zero());
        assert!(!node.has_changes());
        assert!(Month::all().all(|m| node.month_value(m).is_zero()));
    }

    #[test]
    fn test_total_rows_are_aggregates() {
        let node = CategoryNode::total(
            NodeKey::Overall,
            "Income-Expenses",
            CategoryKind::RootTotal,
            0,
            None,
        );
        assert!(!node.is_editable());
        assert!(node.category_id().is_none());
        assert_eq!(node.key.to_string(), "overall");
    }
}
