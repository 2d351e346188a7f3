//! Category display formatting
//!
//! Formats the persisted category trees for terminal output.

use std::collections::HashMap;

use crate::models::{Category, CategoryId, CategoryKind};

/// Format categories as two trees, Income then Expenses
///
/// Hidden and inactive categories are listed with a marker.
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budget-grid init' to create default categories."
            .to_string();
    }

    let mut children: HashMap<Option<CategoryId>, Vec<&Category>> = HashMap::new();
    for category in categories {
        children.entry(category.parent_id).or_default().push(category);
    }

    let mut output = String::new();
    for (i, (kind, title)) in [
        (CategoryKind::Income, "Income"),
        (CategoryKind::Expense, "Expenses"),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", title));

        let roots: Vec<_> = children
            .get(&None)
            .map(|list| list.iter().filter(|c| c.kind == kind).copied().collect())
            .unwrap_or_default();
        if roots.is_empty() {
            output.push_str("  (no categories)\n");
        }
        push_branch(&mut output, &roots, &children, "  ");
    }

    output
}

fn push_branch(
    output: &mut String,
    siblings: &[&Category],
    children: &HashMap<Option<CategoryId>, Vec<&Category>>,
    indent: &str,
) {
    for (j, category) in siblings.iter().enumerate() {
        let is_last = j == siblings.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        output.push_str(&format!(
            "{}{}{}{}\n",
            indent,
            prefix,
            category.name,
            status_suffix(category)
        ));

        if let Some(below) = children.get(&Some(category.id)) {
            let next = format!("{}{}", indent, if is_last { "    " } else { "│   " });
            push_branch(output, below, children, &next);
        }
    }
}

fn status_suffix(category: &Category) -> &'static str {
    match (category.hidden, category.inactive) {
        (_, true) => " (inactive)",
        (true, false) => " (hidden)",
        (false, false) => "",
    }
}
