//! Storage layer for budget-grid
//!
//! JSON file storage with atomic writes. The repositories double as the
//! engine's collaborators: categories are the [`CategorySource`], a
//! [`BudgetBook`] is the [`BudgetStore`] for one budget, and transactions are
//! the [`ActualsSource`].
//!
//! [`CategorySource`]: crate::sources::CategorySource
//! [`BudgetStore`]: crate::sources::BudgetStore
//! [`ActualsSource`]: crate::sources::ActualsSource

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use budget::{BudgetBook, BudgetRepository};
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use crate::config::paths::GridPaths;
use crate::error::{BudgetError, BudgetResult};

pub(crate) fn lock_error(err: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("Failed to acquire lock: {}", err))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: GridPaths,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Create a Storage instance without reading anything
    pub fn new(paths: GridPaths) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    /// Create a Storage instance and load every file
    pub fn open(paths: GridPaths) -> BudgetResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &GridPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> BudgetResult<()> {
        self.categories.load()?;
        self.budgets.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> BudgetResult<()> {
        self.categories.save()?;
        self.budgets.save()?;
        self.transactions.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryKind};
    use tempfile::TempDir;

    #[test]
    fn test_save_all_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = Storage::new(paths.clone()).unwrap();
        assert!(!storage.is_initialized());
        storage
            .categories
            .add(Category::new("Salary", CategoryKind::Income))
            .unwrap();
        storage.save_all().unwrap();

        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.categories.count().unwrap(), 1);
        assert_eq!(reopened.transactions.count().unwrap(), 0);
    }
}
