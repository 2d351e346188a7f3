//! Building the category tree for one (budget, year) selection

use crate::error::BudgetResult;
use crate::models::{CategoryKind, Month};
use crate::sources::{BudgetStore, CategoryEntry, CategorySource};

use super::{CategoryNode, CategoryTree, NodeKey, ROOT_ROW};

/// Display names of the synthetic rows
pub const OVERALL_LABEL: &str = "Income-Expenses";
pub const INCOME_LABEL: &str = "Income";
pub const EXPENSES_LABEL: &str = "Expenses";

impl CategoryTree {
    /// Build the grid rows from a category source and load the persisted
    /// budget values for `year`.
    ///
    /// Category depths are relative to each kind's tree (top-level is 0) and
    /// entries must arrive in pre-order. An entry whose parent cannot be
    /// placed is skipped along with its descendants. Loaded values are not
    /// flagged as changed.
    pub fn build(
        source: &dyn CategorySource,
        store: &dyn BudgetStore,
        year: i32,
    ) -> BudgetResult<Self> {
        let entries = source.iterate()?;

        let mut nodes = vec![CategoryNode::total(
            NodeKey::Overall,
            OVERALL_LABEL,
            CategoryKind::RootTotal,
            0,
            None,
        )];
        append_kind(
            &mut nodes,
            &entries,
            CategoryKind::Income,
            NodeKey::Income,
            INCOME_LABEL,
        );
        append_kind(
            &mut nodes,
            &entries,
            CategoryKind::Expense,
            NodeKey::Expenses,
            EXPENSES_LABEL,
        );

        let mut tree = CategoryTree::from_nodes(nodes);
        let mut loaded = 0usize;
        for row in 0..tree.len() {
            let node = &tree.nodes[row];
            if node.is_aggregate {
                continue;
            }
            let Some(id) = node.category_id() else {
                continue;
            };
            for month in Month::all() {
                if let Some(amount) = store.read_amount(id, year, month)? {
                    tree.load_month_value(row, month, amount)?;
                    loaded += 1;
                }
            }
        }

        tracing::info!(rows = tree.len(), values = loaded, year, "category tree built");
        Ok(tree)
    }
}

fn append_kind(
    nodes: &mut Vec<CategoryNode>,
    entries: &[CategoryEntry],
    kind: CategoryKind,
    key: NodeKey,
    label: &str,
) {
    let subtotal = nodes.len();
    nodes.push(CategoryNode::total(key, label, kind, 1, Some(ROOT_ROW)));

    // path[d] is the row of the most recent entry at category depth d - 1;
    // path[0] is the subtotal row.
    let mut path = vec![subtotal];
    let mut skipping_below: Option<usize> = None;

    for entry in entries.iter().filter(|e| e.kind == kind) {
        if let Some(depth) = skipping_below {
            if entry.depth > depth {
                tracing::warn!(category = %entry.name, "parent category was skipped, skipping");
                continue;
            }
            skipping_below = None;
        }

        if entry.depth >= path.len() {
            tracing::warn!(
                category = %entry.name,
                depth = entry.depth,
                "no parent category found, skipping"
            );
            skipping_below = Some(entry.depth);
            continue;
        }
        path.truncate(entry.depth + 1);
        let parent = path[entry.depth];
        if !nodes[parent].is_aggregate {
            tracing::warn!(
                category = %entry.name,
                parent = %nodes[parent].name,
                "parent category is not a roll-up, skipping"
            );
            skipping_below = Some(entry.depth);
            continue;
        }

        path.push(nodes.len());
        nodes.push(CategoryNode::category(
            entry.id,
            entry.name.clone(),
            kind,
            entry.depth + 2,
            parent,
            entry.is_aggregate,
            entry.currency.clone(),
        ));
    }
}
