//! Custom error types for budget-grid
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every variant is recoverable: the worst
//! outcome of a fault inside the engine is a skipped row and a log entry.

use thiserror::Error;

/// The main error type for budget-grid operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A parent or category reference could not be resolved inside the tree
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Roll-up rows are computed and can never be edited directly
    #[error("Row {row} ('{name}') is a roll-up row and cannot be edited")]
    NotEditable { row: usize, name: String },

    /// A transform was requested for a column it does not apply to
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Cell text that could not be turned into an amount
    #[error("Parse error: {0}")]
    Parse(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for grid rows
    pub fn row_not_found(row: usize) -> Self {
        Self::NotFound {
            entity_type: "Row",
            identifier: row.to_string(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an integrity fault
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Check if this is a rejected edit of a roll-up row
    pub fn is_not_editable(&self) -> bool {
        matches!(self, Self::NotEditable { .. })
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<crate::models::MoneyParseError> for BudgetError {
    fn from(err: crate::models::MoneyParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for budget-grid operations
pub type BudgetResult<T> = Result<T, BudgetError>;
