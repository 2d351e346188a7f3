//! Export module for budget-grid
//!
//! Writes one (budget, year) grid in several formats:
//! - CSV: one line per row, amounts as plain decimals (spreadsheet-compatible)
//! - JSON: machine-readable, amounts in minor units
//! - YAML: the same document as JSON, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_grid_csv;
pub use json::{export_grid_json, GridExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_grid_yaml;
