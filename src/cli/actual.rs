//! Actual transaction CLI commands
//!
//! Recorded transactions are where the actuals-based transforms get their
//! monthly totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_transaction_register;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, Transaction};
use crate::storage::Storage;

/// Actual transaction subcommands
#[derive(Subcommand)]
pub enum ActualCommands {
    /// Record a transaction
    Add {
        /// Category name
        category: String,
        /// Amount spent, or received for an income category
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Memo
        #[arg(short, long)]
        memo: Option<String>,
    },

    /// List recorded transactions
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle an actual transaction command
pub fn handle_actual_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ActualCommands,
) -> BudgetResult<()> {
    let format = settings.currency_format();

    match cmd {
        ActualCommands::Add {
            category,
            amount,
            date,
            memo,
        } => {
            let category = storage
                .categories
                .get_by_name(&category)?
                .ok_or_else(|| BudgetError::category_not_found(&category))?;
            let has_children = storage
                .categories
                .get_all()?
                .iter()
                .any(|c| c.parent_id == Some(category.id));
            if has_children {
                return Err(BudgetError::Validation(format!(
                    "'{}' has sub-categories; record the transaction on one of them",
                    category.name
                )));
            }

            let date = match date {
                Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| {
                    BudgetError::Validation(format!("Invalid date '{}': {}", text, e))
                })?,
                None => chrono::Local::now().date_naive(),
            };
            let entered = Money::parse_with(&amount, &format)?;
            // Income received is stored as negative spending
            let amount = if category.kind.flips_actuals() {
                -entered
            } else {
                entered
            };

            let mut txn = Transaction::new(category.id, date, amount);
            if let Some(memo) = memo {
                txn = txn.with_memo(memo);
            }
            storage.transactions.add(txn)?;
            storage.transactions.save()?;

            println!(
                "Recorded {} in {} on {}",
                entered.format_with(&format),
                category.name,
                date
            );
        }

        ActualCommands::List { category, limit } => {
            let transactions = match category {
                Some(name) => {
                    let category = storage
                        .categories
                        .get_by_name(&name)?
                        .ok_or_else(|| BudgetError::category_not_found(&name))?;
                    storage.transactions.get_by_category(category.id)?
                }
                None => storage.transactions.get_all()?,
            };
            let names: HashMap<_, _> = storage
                .categories
                .get_all()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();

            let shown: Vec<_> = transactions.into_iter().take(limit).collect();
            print!("{}", format_transaction_register(&shown, &names, &format));
        }
    }

    Ok(())
}
