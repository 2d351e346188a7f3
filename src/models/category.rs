//! Category model
//!
//! Categories form two independent trees, one for income and one for
//! expenses. Only categories without children carry budget values; a
//! category with children is a roll-up of its descendants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;

/// The kind of a grid row
///
/// `RootTotal` is only ever used by the synthetic Income − Expenses row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    RootTotal,
    Income,
    Expense,
}

impl CategoryKind {
    /// Income rows hold budgets with the opposite sign to raw actual totals
    pub fn flips_actuals(&self) -> bool {
        matches!(self, Self::Income)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootTotal => write!(f, "Total"),
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            other => Err(format!("unknown category kind '{}'", other)),
        }
    }
}

/// A persisted budget category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// Short name, without any parent names prepended ("Fuel", not "Auto:Fuel")
    pub name: String,

    /// Income or Expense; children always share their parent's kind
    pub kind: CategoryKind,

    /// The category this one rolls up into, if any
    #[serde(default)]
    pub parent_id: Option<CategoryId>,

    /// Sort order among siblings
    #[serde(default)]
    pub sort_order: i32,

    /// Hidden categories are left out of the grid
    #[serde(default)]
    pub hidden: bool,

    /// Inactive categories (and their descendants) are left out of the grid
    #[serde(default)]
    pub inactive: bool,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Category {
    /// Create a new top-level category
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            parent_id: None,
            sort_order: 0,
            hidden: false,
            inactive: false,
            currency: default_currency(),
        }
    }

    /// Create a new category under `parent`, inheriting its kind
    pub fn child_of(name: impl Into<String>, parent: &Category) -> Self {
        let mut category = Self::new(name, parent.kind);
        category.parent_id = Some(parent.id);
        category.currency = parent.currency.clone();
        category
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if self.kind == CategoryKind::RootTotal {
            return Err(CategoryValidationError::InvalidKind);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidKind,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidKind => write!(f, "Categories must be income or expense"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
