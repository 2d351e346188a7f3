//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly budget amounts to budgets.json. Any
//! number of named budgets share the file; [`BudgetBook`] narrows the
//! repository to one of them for the engine.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetResult;
use crate::models::{BudgetEntry, CategoryId, Money, Month};
use crate::sources::BudgetStore;

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    entries: Vec<BudgetEntry>,
}

/// Composite key for budget entries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub budget: String,
    pub category_id: CategoryId,
    pub year: i32,
    pub month: Month,
}

impl EntryKey {
    pub fn new(budget: &str, category_id: CategoryId, year: i32, month: Month) -> Self {
        Self {
            budget: budget.to_string(),
            category_id,
            year,
            month,
        }
    }
}

impl From<&BudgetEntry> for EntryKey {
    fn from(entry: &BudgetEntry) -> Self {
        Self::new(&entry.budget, entry.category_id, entry.year, entry.month)
    }
}

/// Repository for budget entry persistence
pub struct BudgetRepository {
    path: PathBuf,
    entries: RwLock<HashMap<EntryKey, BudgetEntry>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk
    pub fn load(&self) -> BudgetResult<()> {
        let file_data: BudgetData = read_json(&self.path)?;
        let mut entries = self.entries.write().map_err(lock_error)?;

        entries.clear();
        for entry in file_data.entries {
            entries.insert(EntryKey::from(&entry), entry);
        }
        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> BudgetResult<()> {
        let entries = self.entries.read().map_err(lock_error)?;

        let mut list: Vec<_> = entries.values().cloned().collect();
        list.sort_by(|a, b| {
            (&a.budget, a.year, a.month, a.category_id).cmp(&(
                &b.budget,
                b.year,
                b.month,
                b.category_id,
            ))
        });

        write_json_atomic(&self.path, &BudgetData { entries: list })
    }

    pub fn get(
        &self,
        budget: &str,
        category_id: CategoryId,
        year: i32,
        month: Month,
    ) -> BudgetResult<Option<BudgetEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries
            .get(&EntryKey::new(budget, category_id, year, month))
            .cloned())
    }

    /// Insert or update an entry
    pub fn upsert(&self, entry: BudgetEntry) -> BudgetResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.insert(EntryKey::from(&entry), entry);
        Ok(())
    }

    /// Entries of one budget and year
    pub fn entries_for(&self, budget: &str, year: i32) -> BudgetResult<Vec<BudgetEntry>> {
        let entries = self.entries.read().map_err(lock_error)?;
        let mut list: Vec<_> = entries
            .values()
            .filter(|e| e.budget == budget && e.year == year)
            .cloned()
            .collect();
        list.sort_by_key(|e| (e.month, e.category_id));
        Ok(list)
    }

    /// Names of every budget with at least one entry, sorted
    pub fn budget_names(&self) -> BudgetResult<Vec<String>> {
        let entries = self.entries.read().map_err(lock_error)?;
        let names: BTreeSet<_> = entries.keys().map(|k| k.budget.clone()).collect();
        Ok(names.into_iter().collect())
    }

    pub fn count(&self) -> BudgetResult<usize> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.len())
    }

    /// A [`BudgetStore`] view of one named budget
    pub fn book<'a>(&'a self, budget: &str) -> BudgetBook<'a> {
        BudgetBook {
            repo: self,
            budget: budget.to_string(),
        }
    }
}

/// One named budget, as seen by the engine
pub struct BudgetBook<'a> {
    repo: &'a BudgetRepository,
    budget: String,
}

impl BudgetBook<'_> {
    pub fn name(&self) -> &str {
        &self.budget
    }
}

impl BudgetStore for BudgetBook<'_> {
    fn read_amount(
        &self,
        category: CategoryId,
        year: i32,
        month: Month,
    ) -> BudgetResult<Option<Money>> {
        Ok(self
            .repo
            .get(&self.budget, category, year, month)?
            .map(|entry| entry.amount))
    }

    fn write_amount(
        &self,
        category: CategoryId,
        year: i32,
        month: Month,
        amount: Money,
    ) -> BudgetResult<()> {
        self.repo
            .upsert(BudgetEntry::new(&self.budget, category, year, month, amount))
    }

    fn flush(&self) -> BudgetResult<()> {
        self.repo.save()
    }
}
