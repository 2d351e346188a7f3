//! CSV export of a budget grid

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::GridExport;
use crate::models::{CurrencyFormat, Month};

/// Export the grid rows as CSV
///
/// Amounts are written as plain decimals without a currency symbol.
pub fn export_grid_csv<W: Write>(export: &GridExport, writer: W) -> BudgetResult<()> {
    let to_export_error = |e: ::csv::Error| BudgetError::Export(e.to_string());
    let format = CurrencyFormat::new("", export.decimal_places);

    let mut csv_writer = ::csv::Writer::from_writer(writer);

    let mut header = vec![
        "Row".to_string(),
        "Category".to_string(),
        "Depth".to_string(),
        "Kind".to_string(),
        "Editable".to_string(),
    ];
    header.extend(Month::all().map(|m| m.short_name().to_string()));
    header.push("Total".to_string());
    csv_writer.write_record(&header).map_err(to_export_error)?;

    for row in &export.rows {
        let mut record = vec![
            row.row.to_string(),
            row.name.clone(),
            row.depth.to_string(),
            row.kind.to_string(),
            row.editable.to_string(),
        ];
        record.extend(row.months.iter().map(|v| v.format_with(&format)));
        record.push(row.total.format_with(&format));
        csv_writer.write_record(&record).map_err(to_export_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))
}
