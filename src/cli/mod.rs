//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod actual;
pub mod budget;
pub mod category;
pub mod export;

pub use actual::{handle_actual_command, ActualCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
