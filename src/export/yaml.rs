//! YAML export of a budget grid

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::GridExport;

/// Export the grid as YAML, with a short header comment
pub fn export_grid_yaml<W: Write>(export: &GridExport, writer: &mut W) -> BudgetResult<()> {
    let to_export_error = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# budget-grid export: {} {}", export.budget, export.year)
        .map_err(to_export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(to_export_error)?;
    writeln!(writer, "# Amounts are in minor currency units").map_err(to_export_error)?;

    serde_yaml::to_writer(writer, export).map_err(|e| BudgetError::Export(e.to_string()))
}
