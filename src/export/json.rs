//! JSON export of a budget grid

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::services::SessionContext;
use crate::tree::{CategoryTree, GridRow};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One grid, ready for serialization
#[derive(Debug, Clone, Serialize)]
pub struct GridExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub budget: String,
    pub year: i32,
    /// Digits after the decimal point; amounts are in minor units
    pub decimal_places: u32,
    pub rows: Vec<GridRow>,
}

impl GridExport {
    pub fn new(context: &SessionContext, tree: &CategoryTree) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            budget: context.budget.clone(),
            year: context.year,
            decimal_places: context.format.decimal_places,
            rows: tree.snapshot(),
        }
    }
}

/// Export the grid as JSON
pub fn export_grid_json<W: Write>(
    export: &GridExport,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    };
    result.map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrencyFormat, Money, Month};
    use crate::tree::fixtures::{sample_tree, RENT};
    use crate::tree::NullSink;

    #[test]
    fn test_export_json() {
        let mut tree = sample_tree();
        tree.set_month_value(RENT, Month::JANUARY, Money::from_minor(90000), &mut NullSink)
            .unwrap();
        let context = SessionContext::new("Household", 2024, CurrencyFormat::default());
        let export = GridExport::new(&context, &tree);

        let mut buffer = Vec::new();
        export_grid_json(&export, &mut buffer, false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["budget"], "Household");
        assert_eq!(value["year"], 2024);
        assert_eq!(value["rows"].as_array().unwrap().len(), tree.len());
        assert_eq!(value["rows"][0]["months"][0], -90000);
        assert_eq!(value["rows"][RENT]["kind"], "expense");
    }
}
