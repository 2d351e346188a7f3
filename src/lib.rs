//! budget-grid - twelve-month budget editor
//!
//! This library holds the core of a spreadsheet-style budget: a category
//! tree with one row per category and one column per month, where parent
//! categories and the Income/Expenses subtotals are kept up to date as
//! cells change, and the top row shows Income minus Expenses.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, money, months, transactions)
//! - `sources`: Seams the tree is loaded from and saved to
//! - `tree`: The category tree and its aggregation rules
//! - `services`: Transforms and the editing session
//! - `storage`: JSON file storage layer
//! - `display`, `export`: Rendering the grid
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_grid::config::{paths::GridPaths, settings::Settings};
//! use budget_grid::services::{EditSession, SessionContext};
//! use budget_grid::storage::Storage;
//!
//! let paths = GridPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! let session = EditSession::open(&storage, SessionContext::from_settings(&settings, None, None))?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod sources;
pub mod storage;
pub mod tree;

pub use error::{BudgetError, BudgetResult};
