//! Budget grid rendering
//!
//! One line per tree row, indented by depth, with a column per month and the
//! year total last.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::{Column, CurrencyFormat, Month};
use crate::services::Transform;
use crate::tree::GridRow;

/// Render the grid rows as a table
///
/// Rows that cannot be edited directly are marked with `Σ`.
pub fn format_grid(rows: &[GridRow], format: &CurrencyFormat) -> String {
    if rows.is_empty() {
        return "No categories found.\n\nRun 'budget-grid init' to create default categories."
            .to_string();
    }

    let mut builder = Builder::default();
    let mut header = vec!["Category".to_string()];
    header.extend(Month::all().map(|m| m.short_name().to_string()));
    header.push("Total".to_string());
    builder.push_record(header);

    for row in rows {
        let marker = if row.editable { "" } else { "Σ " };
        let mut record = vec![format!("{}{}{}", "  ".repeat(row.depth), marker, row.name)];
        record.extend(row.months.iter().map(|v| v.format_with(format)));
        record.push(row.total.format_with(format));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// One row across the year, as a two-column table
pub fn format_row_details(row: &GridRow, format: &CurrencyFormat) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Month".to_string(), row.name.clone()]);
    for month in Month::all() {
        builder.push_record([
            month.short_name().to_string(),
            row.months[month.index()].format_with(format),
        ]);
    }
    builder.push_record(["Total".to_string(), row.total.format_with(format)]);

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// The transforms offered for a column, one per line
pub fn format_transform_menu(column: Column) -> String {
    let mut output = format!("Transforms for the {} column:\n", column);
    for transform in Transform::available_for(column) {
        output.push_str(&format!(
            "  {:14} {}\n",
            transform.name(),
            transform.description()
        ));
    }
    output
}
