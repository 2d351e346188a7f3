//! Editing sessions
//!
//! An [`EditSession`] owns the category tree for one (budget, year) selection
//! and is the only thing that mutates it. Changing the selection rebuilds the
//! tree from storage; edits that were not saved are dropped.

use chrono::Datelike;
use serde::Serialize;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, Column, CurrencyFormat, Money, Month};
use crate::sources::{ActualsSource, BudgetStore};
use crate::storage::Storage;
use crate::tree::{CategoryTree, ChangeSink};

use super::transform::{Transform, TransformEngine};

/// The selection and formatting rules a session works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub budget: String,
    pub year: i32,
    pub format: CurrencyFormat,
}

impl SessionContext {
    pub fn new(budget: impl Into<String>, year: i32, format: CurrencyFormat) -> Self {
        Self {
            budget: budget.into(),
            year,
            format,
        }
    }

    /// Context from user settings; the year defaults to the current one
    pub fn from_settings(settings: &Settings, budget: Option<&str>, year: Option<i32>) -> Self {
        Self::new(
            budget.unwrap_or(&settings.budget_name),
            year.unwrap_or_else(|| chrono::Local::now().year()),
            settings.currency_format(),
        )
    }
}

/// What a save pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    /// Cells written to the store
    pub written: usize,
    /// Changed cells left unwritten because they are zero and have no record
    pub skipped: usize,
}

/// Write every changed cell of every leaf category row back to `store`.
///
/// A zero value is not written when the store has no record for the cell.
/// Flags of written cells are cleared only after the store has been flushed,
/// so a failed flush leaves them pending for the next save. A second pass
/// after a successful one writes nothing.
pub fn save_dirty_cells(
    tree: &mut CategoryTree,
    store: &dyn BudgetStore,
    year: i32,
) -> BudgetResult<SaveReport> {
    let mut report = SaveReport::default();
    let mut written = Vec::new();

    for row in 0..tree.len() {
        let node = tree.node(row)?;
        if node.is_aggregate || !node.has_changes() {
            continue;
        }
        let Some(category) = node.category_id() else {
            continue;
        };
        let pending: Vec<(Month, Money)> = Month::all()
            .filter(|&m| node.is_changed(m))
            .map(|m| (m, node.month_value(m)))
            .collect();

        for (month, value) in pending {
            if value.is_zero() && store.read_amount(category, year, month)?.is_none() {
                report.skipped += 1;
                tree.clear_changed(row, month)?;
            } else {
                store.write_amount(category, year, month, value)?;
                report.written += 1;
                written.push((row, month));
            }
        }
    }

    if !written.is_empty() {
        store.flush()?;
    }
    for (row, month) in written {
        tree.clear_changed(row, month)?;
    }
    Ok(report)
}

/// One budget and year open for editing
pub struct EditSession<'a> {
    storage: &'a Storage,
    context: SessionContext,
    tree: CategoryTree,
    unsaved: bool,
}

impl<'a> EditSession<'a> {
    /// Build the tree for `context` from storage
    pub fn open(storage: &'a Storage, context: SessionContext) -> BudgetResult<Self> {
        let tree = load_tree(storage, &context)?;
        Ok(Self {
            storage,
            context,
            tree,
            unsaved: false,
        })
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    /// True if any edit has not been saved yet
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Row of the category with this name
    pub fn find_row(&self, name: &str) -> BudgetResult<usize> {
        self.tree
            .find_by_name(name)
            .ok_or_else(|| BudgetError::category_not_found(name.trim()))
    }

    /// Parse cell text and store it in one month of a row
    pub fn enter_text(
        &mut self,
        row: usize,
        month: Month,
        text: &str,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<bool> {
        let value = Money::parse_with(text, &self.context.format)?;
        self.set_value(row, month, value, sink)
    }

    pub fn set_value(
        &mut self,
        row: usize,
        month: Month,
        value: Money,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<bool> {
        let changed = self.tree.set_month_value(row, month, value, sink)?;
        self.unsaved |= changed;
        Ok(changed)
    }

    /// Run a transform against one row, with actuals from the ledger
    pub fn apply(
        &mut self,
        row: usize,
        column: Column,
        transform: Transform,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<usize> {
        let storage = self.storage;
        self.apply_with(&storage.transactions, row, column, transform, sink)
    }

    /// Run a transform with actuals from any source
    pub fn apply_with(
        &mut self,
        actuals: &dyn ActualsSource,
        row: usize,
        column: Column,
        transform: Transform,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<usize> {
        let engine = TransformEngine::new(actuals, self.context.year);
        let changed = engine.apply(&mut self.tree, row, column, transform, sink)?;
        self.unsaved |= changed > 0;
        Ok(changed)
    }

    /// Set every leaf month to what budget `source` held a year earlier.
    ///
    /// Months with no record in `source` become zero. Returns the number of
    /// cells that changed.
    pub fn initialize_from_budget(
        &mut self,
        source: &str,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<usize> {
        if !self
            .storage
            .budgets
            .budget_names()?
            .iter()
            .any(|name| name == source)
        {
            return Err(BudgetError::budget_not_found(source));
        }
        let storage = self.storage;
        let book = storage.budgets.book(source);
        let prior_year = self.context.year - 1;

        let mut changed = 0;
        for row in 0..self.tree.len() {
            let Some(category) = self.leaf_category(row) else {
                continue;
            };
            for month in Month::all() {
                let value = book
                    .read_amount(category, prior_year, month)?
                    .unwrap_or_default();
                if self.set_value(row, month, value, sink)? {
                    changed += 1;
                }
            }
        }

        tracing::info!(source, year = prior_year, changed, "initialized from prior budget");
        Ok(changed)
    }

    /// Set every leaf month to last year's actual total for that month
    ///
    /// Income rows take the negated total, as the actuals-based transforms do.
    pub fn initialize_from_prior_actuals(&mut self, sink: &mut dyn ChangeSink) -> BudgetResult<usize> {
        let storage = self.storage;
        let actuals: &dyn ActualsSource = &storage.transactions;
        let prior_year = self.context.year - 1;

        let mut changed = 0;
        for row in 0..self.tree.len() {
            let Some(category) = self.leaf_category(row) else {
                continue;
            };
            let flip = self.tree.node(row)?.kind.flips_actuals();
            let totals = actuals.totals_for(category, prior_year, Month::JANUARY, 12)?;
            for month in Month::all() {
                let actual = totals.get(month);
                let value = if flip { -actual } else { actual };
                if self.set_value(row, month, value, sink)? {
                    changed += 1;
                }
            }
        }

        tracing::info!(year = prior_year, changed, "initialized from prior actuals");
        Ok(changed)
    }

    /// Write changed cells back to the budget store
    pub fn save(&mut self) -> BudgetResult<SaveReport> {
        let book = self.storage.budgets.book(&self.context.budget);
        let report = save_dirty_cells(&mut self.tree, &book, self.context.year)?;
        self.unsaved = false;

        tracing::info!(
            budget = %self.context.budget,
            year = self.context.year,
            written = report.written,
            skipped = report.skipped,
            "budget saved"
        );
        Ok(report)
    }

    /// Drop unsaved edits by rebuilding the tree from storage
    pub fn discard(&mut self) -> BudgetResult<()> {
        if self.unsaved {
            tracing::info!(budget = %self.context.budget, "unsaved changes discarded");
        }
        self.tree = load_tree(self.storage, &self.context)?;
        self.unsaved = false;
        Ok(())
    }

    /// Open a different budget or year; unsaved edits are dropped
    pub fn switch_to(&mut self, budget: &str, year: i32) -> BudgetResult<()> {
        let context = SessionContext::new(budget, year, self.context.format.clone());
        self.tree = load_tree(self.storage, &context)?;
        self.context = context;
        self.unsaved = false;
        Ok(())
    }

    fn leaf_category(&self, row: usize) -> Option<CategoryId> {
        self.tree
            .get(row)
            .filter(|node| !node.is_aggregate)
            .and_then(|node| node.category_id())
    }
}

fn load_tree(storage: &Storage, context: &SessionContext) -> BudgetResult<CategoryTree> {
    let book = storage.budgets.book(&context.budget);
    let tree = CategoryTree::build(&storage.categories, &book, context.year)?;
    tracing::info!(budget = %context.budget, year = context.year, "budget opened");
    Ok(tree)
}
