//! Budget grid CLI commands
//!
//! Each command opens an editing session for the selected budget and year,
//! performs one edit, and saves before returning.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_grid, format_row_details, format_transform_menu};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Column, Month};
use crate::services::{EditSession, SaveReport, SessionContext, Transform};
use crate::storage::Storage;
use crate::tree::NullSink;

/// Budget grid subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the budget grid
    Show {
        /// Show a single category across the year
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Set one month of a category
    Set {
        /// Category name
        category: String,
        /// Month name or number (e.g. "mar" or "3")
        month: String,
        /// Amount (e.g. "250", "1,250.00", "-40")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Run a transform on a category, or list the transforms for a column
    Apply {
        /// Category name
        category: String,
        /// Month name or number, or "total"
        column: String,
        /// Transform name; omit to list what is available
        transform: Option<String>,
    },

    /// Fill this year from last year's budget or actuals
    Initialize {
        /// Copy last year's values of this budget
        #[arg(long, conflicts_with = "from_actuals", required_unless_present = "from_actuals")]
        from_budget: Option<String>,
        /// Use last year's actual totals
        #[arg(long)]
        from_actuals: bool,
    },

    /// List budgets that have saved amounts
    Budgets,
}

/// Handle a budget grid command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    context: SessionContext,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    match cmd {
        BudgetCommands::Show { category } => {
            let session = EditSession::open(storage, context)?;
            let format = &session.context().format;
            let rows = session.tree().snapshot();

            match category {
                Some(name) => {
                    let row = session.find_row(&name)?;
                    println!("{}", format_row_details(&rows[row], format));
                }
                None => {
                    println!(
                        "Budget: {} ({})",
                        session.context().budget,
                        session.context().year
                    );
                    println!("{}", format_grid(&rows, format));
                }
            }
        }

        BudgetCommands::Set {
            category,
            month,
            amount,
        } => {
            let month: Month = month.parse().map_err(BudgetError::Validation)?;
            let mut session = EditSession::open(storage, context)?;
            let row = session.find_row(&category)?;

            if session.enter_text(row, month, &amount, &mut NullSink)? {
                session.save()?;
                let node = session.tree().node(row)?;
                println!(
                    "Set {} {} to {} (year total {})",
                    node.name,
                    month,
                    node.month_value(month).format_with(&session.context().format),
                    node.year_total().format_with(&session.context().format)
                );
            } else {
                println!("{} {} is already {}", category, month, amount.trim());
            }
        }

        BudgetCommands::Apply {
            category,
            column,
            transform,
        } => {
            let column: Column = column.parse().map_err(BudgetError::InvalidColumn)?;
            let Some(transform) = transform else {
                print!("{}", format_transform_menu(column));
                return Ok(());
            };
            let transform: Transform = transform.parse()?;

            let mut session = EditSession::open(storage, context)?;
            let row = session.find_row(&category)?;
            let changed = session.apply(row, column, transform, &mut NullSink)?;
            session.save()?;

            let rows = session.tree().snapshot();
            println!(
                "Applied '{}' to {}: {} month(s) changed",
                transform.description(),
                rows[row].name,
                changed
            );
            println!("{}", format_row_details(&rows[row], &session.context().format));
        }

        BudgetCommands::Initialize {
            from_budget,
            from_actuals,
        } => {
            let mut session = EditSession::open(storage, context)?;
            let prior_year = session.context().year - 1;
            let changed = match from_budget {
                Some(source) if !from_actuals => {
                    let changed = session.initialize_from_budget(&source, &mut NullSink)?;
                    println!("Copied budget '{}' for {}", source, prior_year);
                    changed
                }
                _ => {
                    let changed = session.initialize_from_prior_actuals(&mut NullSink)?;
                    println!("Copied actual totals for {}", prior_year);
                    changed
                }
            };
            let report = session.save()?;
            print_save_report(changed, report);
        }

        BudgetCommands::Budgets => {
            let names = storage.budgets.budget_names()?;
            if names.is_empty() {
                println!("No budgets saved yet. Default budget: {}", settings.budget_name);
                return Ok(());
            }
            for name in names {
                let marker = if name == settings.budget_name { "*" } else { " " };
                println!("{} {}", marker, name);
            }
        }
    }

    Ok(())
}

fn print_save_report(changed: usize, report: SaveReport) {
    println!(
        "{} cell(s) changed, {} written, {} left empty",
        changed, report.written, report.skipped
    );
}
