//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, indexed by
//! category. Monthly totals from here are the "actuals" the transforms use.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Datelike;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, Money, Month, Transaction, TransactionId};
use crate::sources::{ActualTotals, ActualsSource};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> BudgetResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;
        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            by_category.entry(txn.category_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> BudgetResult<()> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Record a new transaction
    pub fn add(&self, txn: Transaction) -> BudgetResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        if data.contains_key(&txn.id) {
            return Err(BudgetError::Duplicate {
                entity_type: "Transaction",
                identifier: txn.id.to_string(),
            });
        }
        by_category.entry(txn.category_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> BudgetResult<Vec<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Transactions booked to one category, newest first
    pub fn get_by_category(&self, category_id: CategoryId) -> BudgetResult<Vec<Transaction>> {
        let data = self.data.read().map_err(lock_error)?;
        let by_category = self.by_category.read().map_err(lock_error)?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    pub fn count(&self) -> BudgetResult<usize> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

impl ActualsSource for TransactionRepository {
    fn totals_for(
        &self,
        category: CategoryId,
        year: i32,
        start: Month,
        count: u8,
    ) -> BudgetResult<ActualTotals> {
        let months: Vec<Month> = start.through_year_end().take(count as usize).collect();
        let mut values = vec![Money::zero(); months.len()];

        for txn in self.get_by_category(category)? {
            if txn.date.year() != year {
                continue;
            }
            if let Some(slot) = months
                .iter()
                .position(|m| u32::from(m.number()) == txn.date.month())
            {
                values[slot] += txn.amount;
            }
        }

        Ok(ActualTotals::new(start, values))
    }
}
