//! Path management for budget-grid
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_GRID_DATA_DIR` environment variable (if set)
//! 2. The platform data directory for "budget-grid" (via `directories`)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{BudgetError, BudgetResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BUDGET_GRID_DATA_DIR";

/// Manages all paths used by budget-grid
#[derive(Debug, Clone)]
pub struct GridPaths {
    base_dir: PathBuf,
}

impl GridPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> BudgetResult<Self> {
        if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            if !custom.trim().is_empty() {
                return Ok(Self::with_base_dir(PathBuf::from(custom)));
            }
        }

        let dirs = ProjectDirs::from("", "", "budget-grid").ok_or_else(|| {
            BudgetError::Config("Could not determine a home directory".to_string())
        })?;
        Ok(Self::with_base_dir(dirs.data_dir().to_path_buf()))
    }

    /// Use a fixed base directory (tests, scripted use)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the JSON data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// budgets.json: monthly amounts for every named budget
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// transactions.json: the actuals
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> BudgetResult<()> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))
    }

    /// True once `init` has written a settings file
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let paths = GridPaths::with_base_dir(PathBuf::from("/tmp/grid"));
        assert_eq!(paths.settings_file(), PathBuf::from("/tmp/grid/config.json"));
        assert_eq!(
            paths.budgets_file(),
            PathBuf::from("/tmp/grid/data/budgets.json")
        );
        assert_eq!(
            paths.categories_file(),
            PathBuf::from("/tmp/grid/data/categories.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().join("grid"));

        assert!(!paths.is_initialized());
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
    }
}
