//! Category tree model
//!
//! The budget grid is an ordered arena of [`CategoryNode`] rows in pre-order:
//! the Income − Expenses row, the Income subtotal and its categories, then the
//! Expenses subtotal and its categories. Rows refer to their parent by index.
//!
//! Every value change goes through [`CategoryTree::set_month_value`], which
//! keeps these invariants after each call:
//!
//! - a roll-up row's month value is the sum of its direct children's values
//! - every row's year total is the sum of its twelve months
//! - the overall row is Income − Expenses: a change that starts in an
//!   expense row reaches the overall row with its sign reversed

pub mod builder;
pub mod node;
pub mod sink;

pub use node::{CategoryNode, NodeKey};
pub use sink::{ChangeLog, ChangeSink, NullSink};

use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, CategoryKind, Column, Money, Month};

/// Row index of the Income − Expenses row
pub const ROOT_ROW: usize = 0;

/// The rows of one (budget, year) selection
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
}

/// A read-only copy of one grid row, for display and export
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub row: usize,
    pub name: String,
    pub depth: usize,
    pub kind: CategoryKind,
    pub editable: bool,
    pub months: [Money; 12],
    pub total: Money,
}

impl CategoryTree {
    /// Wrap an already ordered set of rows
    ///
    /// Row values are taken as given; use [`CategoryTree::check_invariants`]
    /// to confirm they are consistent.
    pub fn from_nodes(nodes: Vec<CategoryNode>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&CategoryNode> {
        self.nodes.get(row)
    }

    /// Get a row, or a "not found" error
    pub fn node(&self, row: usize) -> BudgetResult<&CategoryNode> {
        self.nodes
            .get(row)
            .ok_or_else(|| BudgetError::row_not_found(row))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.iter()
    }

    /// Row holding the given category
    pub fn find_category(&self, id: CategoryId) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.key == NodeKey::Category(id))
    }

    /// First row whose name matches, ignoring case.
    ///
    /// Category rows win over the Income, Expenses and Income-Expenses rows,
    /// so a category may share a name with one of them.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        let matches = |n: &&CategoryNode| n.name.eq_ignore_ascii_case(name);
        self.nodes
            .iter()
            .position(|n| n.category_id().is_some() && matches(&n))
            .or_else(|| self.nodes.iter().position(|n| matches(&n)))
    }

    /// Direct children of a row, in grid order
    pub fn children(&self, row: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Some(row))
            .map(|(i, _)| i)
            .collect()
    }

    /// Set one month of a leaf row and roll the change up to the root.
    ///
    /// Returns `Ok(false)` when the value is already `value`. A changed cell
    /// is flagged as needing write-back. Roll-up rows are rejected without
    /// touching anything.
    pub fn set_month_value(
        &mut self,
        row: usize,
        month: Month,
        value: Money,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<bool> {
        let node = self.node(row)?;
        if node.is_aggregate {
            return Err(BudgetError::NotEditable {
                row,
                name: node.name.clone(),
            });
        }
        if node.month_value(month) == value {
            return Ok(false);
        }

        self.check_headroom(row, month, value)?;
        self.nodes[row].dirty[month.index()] = true;
        self.propagate(row, month, value, sink)?;
        Ok(true)
    }

    /// Set a value read from the store; the cell is not flagged as changed
    pub(crate) fn load_month_value(
        &mut self,
        row: usize,
        month: Month,
        value: Money,
    ) -> BudgetResult<()> {
        self.node(row)?;
        self.check_headroom(row, month, value)?;
        self.propagate(row, month, value, &mut NullSink)
    }

    fn propagate(
        &mut self,
        row: usize,
        month: Month,
        value: Money,
        sink: &mut dyn ChangeSink,
    ) -> BudgetResult<()> {
        let index = month.index();
        let origin_kind = self.nodes[row].kind;
        let mut current = row;
        let mut value = value;

        // A well-formed chain visits each row at most once.
        for _ in 0..self.nodes.len() {
            let node = &mut self.nodes[current];
            let previous = node.months[index];
            node.months[index] = value;
            node.year_total += value - previous;
            let parent = node.parent;

            sink.cell_changed(current, Column::Month(month));
            sink.cell_changed(current, Column::Total);

            let Some(parent) = parent else {
                return Ok(());
            };
            let Some(parent_node) = self.nodes.get(parent) else {
                tracing::error!(
                    row = current,
                    parent,
                    name = %self.nodes[current].name,
                    "parent row does not exist, roll-up stopped"
                );
                return Err(BudgetError::Integrity(format!(
                    "row {} refers to missing parent row {}",
                    current, parent
                )));
            };

            let delta = if parent_node.kind == CategoryKind::RootTotal
                && origin_kind == CategoryKind::Expense
            {
                previous - value
            } else {
                value - previous
            };
            value = parent_node.months[index] + delta;
            current = parent;
        }

        tracing::error!(row, "parent chain does not reach the root, roll-up stopped");
        Err(BudgetError::Integrity(format!(
            "parent chain starting at row {} has a cycle",
            row
        )))
    }

    /// Walk the roll-up chain with checked arithmetic so an amount that
    /// would overflow a month or year total is refused before any cell
    /// changes. Broken chains are left for `propagate` to report.
    fn check_headroom(&self, row: usize, month: Month, value: Money) -> BudgetResult<()> {
        let index = month.index();
        let origin_kind = self.nodes[row].kind;
        let requested = value;
        let overflow = move || {
            BudgetError::Validation(format!(
                "amount {} in row {} would overflow a total",
                requested.minor_units(),
                row
            ))
        };

        let mut current = row;
        let mut value = value;
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[current];
            let previous = node.months[index];
            let delta = value.checked_sub(previous).ok_or_else(overflow)?;
            node.year_total.checked_add(delta).ok_or_else(overflow)?;

            let Some(parent) = node.parent else {
                return Ok(());
            };
            let Some(parent_node) = self.nodes.get(parent) else {
                return Ok(());
            };
            let delta = if parent_node.kind == CategoryKind::RootTotal
                && origin_kind == CategoryKind::Expense
            {
                previous.checked_sub(value).ok_or_else(overflow)?
            } else {
                delta
            };
            value = parent_node.months[index]
                .checked_add(delta)
                .ok_or_else(overflow)?;
            current = parent;
        }
        Ok(())
    }

    /// Flag a cell as needing write-back
    pub fn mark_changed(&mut self, row: usize, month: Month) -> BudgetResult<()> {
        let node = self
            .nodes
            .get_mut(row)
            .ok_or_else(|| BudgetError::row_not_found(row))?;
        node.dirty[month.index()] = true;
        Ok(())
    }

    /// Clear a cell's write-back flag
    pub fn clear_changed(&mut self, row: usize, month: Month) -> BudgetResult<()> {
        let node = self
            .nodes
            .get_mut(row)
            .ok_or_else(|| BudgetError::row_not_found(row))?;
        node.dirty[month.index()] = false;
        Ok(())
    }

    /// True if any cell holds an edit not yet written back
    pub fn has_changes(&self) -> bool {
        self.nodes.iter().any(CategoryNode::has_changes)
    }

    /// Verify roll-ups and year totals, reporting the first inconsistency
    pub fn check_invariants(&self) -> BudgetResult<()> {
        for (row, node) in self.nodes.iter().enumerate() {
            let sum: Money = node.months.iter().copied().sum();
            if sum != node.year_total {
                return Err(BudgetError::Integrity(format!(
                    "row {} ('{}') total {} does not match its months ({})",
                    row, node.name, node.year_total, sum
                )));
            }
            if let Some(parent) = node.parent {
                if parent >= self.nodes.len() {
                    return Err(BudgetError::Integrity(format!(
                        "row {} refers to missing parent row {}",
                        row, parent
                    )));
                }
            }
        }

        for (row, node) in self.nodes.iter().enumerate() {
            if !node.is_aggregate {
                continue;
            }
            let children = self.children(row);
            for month in Month::all() {
                let expected: Money = children
                    .iter()
                    .map(|&child| {
                        let child = &self.nodes[child];
                        let value = child.month_value(month);
                        if node.kind == CategoryKind::RootTotal
                            && child.kind == CategoryKind::Expense
                        {
                            -value
                        } else {
                            value
                        }
                    })
                    .sum();
                if expected != node.month_value(month) {
                    return Err(BudgetError::Integrity(format!(
                        "row {} ('{}') {} is {} but its children add up to {}",
                        row,
                        node.name,
                        month,
                        node.month_value(month),
                        expected
                    )));
                }
            }
        }

        Ok(())
    }

    /// Copy every row out for display or export
    pub fn snapshot(&self) -> Vec<GridRow> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(row, node)| GridRow {
                row,
                name: node.name.clone(),
                depth: node.depth,
                kind: node.kind,
                editable: node.is_editable(),
                months: node.months,
                total: node.year_total,
            })
            .collect()
    }
}
