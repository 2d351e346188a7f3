//! Storage initialization
//!
//! First-run setup: directories, settings and a starter category tree.

use crate::config::paths::GridPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::models::{Category, CategoryKind};

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone, so running this twice is harmless.
pub fn initialize_storage(paths: &GridPaths) -> BudgetResult<()> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }
    if !paths.categories_file().exists() {
        create_default_categories(paths)?;
    }

    tracing::info!(base_dir = %paths.base_dir().display(), "storage initialized");
    Ok(())
}

/// Starter categories: (top-level name, kind, sub-categories)
const DEFAULT_CATEGORIES: &[(&str, CategoryKind, &[&str])] = &[
    ("Salary", CategoryKind::Income, &[]),
    ("Interest", CategoryKind::Income, &[]),
    ("Housing", CategoryKind::Expense, &["Rent", "Utilities"]),
    ("Food", CategoryKind::Expense, &["Groceries", "Dining Out"]),
    ("Transportation", CategoryKind::Expense, &[]),
];

fn create_default_categories(paths: &GridPaths) -> BudgetResult<()> {
    let mut categories = Vec::new();

    for (i, (name, kind, children)) in DEFAULT_CATEGORIES.iter().enumerate() {
        let parent = Category::new(*name, *kind).with_sort_order(i as i32);
        for (j, child) in children.iter().enumerate() {
            categories.push(Category::child_of(*child, &parent).with_sort_order(j as i32));
        }
        categories.push(parent);
    }

    write_json_atomic(paths.categories_file(), &CategoryData { categories })
}
