//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_tree;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, CategoryKind};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories as Income and Expense trees
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// "income" or "expense"; taken from the parent when omitted
        #[arg(short, long)]
        kind: Option<String>,
        /// Parent category name
        #[arg(short, long)]
        parent: Option<String>,
        /// Position among its siblings
        #[arg(short, long)]
        sort: Option<i32>,
    },

    /// Leave a category (and everything below it) out of the grid
    Hide {
        /// Category name
        name: String,
    },

    /// Show a hidden category in the grid again
    Unhide {
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> BudgetResult<()> {
    match cmd {
        CategoryCommands::List => {
            let categories = storage.categories.get_all()?;
            print!("{}", format_category_tree(&categories));
        }

        CategoryCommands::Add {
            name,
            kind,
            parent,
            sort,
        } => {
            let kind = kind
                .map(|k| k.parse::<CategoryKind>().map_err(BudgetError::Validation))
                .transpose()?;

            let mut category = match parent {
                Some(parent_name) => {
                    let parent = find(storage, &parent_name)?;
                    let mut category = Category::child_of(name.trim(), &parent);
                    if let Some(kind) = kind {
                        category.kind = kind;
                    }
                    category
                }
                None => {
                    let kind = kind.ok_or_else(|| {
                        BudgetError::Validation(
                            "--kind is required for a top-level category".into(),
                        )
                    })?;
                    Category::new(name.trim(), kind)
                }
            };
            if let Some(sort) = sort {
                category.sort_order = sort;
            }

            let summary = format!("{} ({})", category.name, category.kind);
            storage.categories.add(category)?;
            storage.categories.save()?;
            println!("Created category: {}", summary);
        }

        CategoryCommands::Hide { name } => set_hidden(storage, &name, true)?,
        CategoryCommands::Unhide { name } => set_hidden(storage, &name, false)?,
    }

    Ok(())
}

fn find(storage: &Storage, name: &str) -> BudgetResult<Category> {
    storage
        .categories
        .get_by_name(name)?
        .ok_or_else(|| BudgetError::category_not_found(name))
}

fn set_hidden(storage: &Storage, name: &str, hidden: bool) -> BudgetResult<()> {
    let mut category = find(storage, name)?;
    category.hidden = hidden;
    let label = category.name.clone();
    storage.categories.upsert(category)?;
    storage.categories.save()?;

    println!(
        "{} is now {}",
        label,
        if hidden { "hidden" } else { "visible" }
    );
    Ok(())
}
