//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json, and enumerates
//! them in grid order as the engine's [`CategorySource`].

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, CategoryId, CategoryKind};
use crate::sources::{CategoryEntry, CategorySource};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> BudgetResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;
        let mut categories = self.categories.write().map_err(lock_error)?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }
        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> BudgetResult<()> {
        let categories = self.categories.read().map_err(lock_error)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    pub fn get(&self, id: CategoryId) -> BudgetResult<Option<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    /// All categories, by sort order then name
    pub fn get_all(&self) -> BudgetResult<Vec<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(list)
    }

    /// Find a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BudgetResult<Option<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        let name = name.trim();
        Ok(categories
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    /// Validate and insert a new category
    ///
    /// The parent, if any, must exist and have the same kind, and no sibling
    /// may already use the name.
    pub fn add(&self, category: Category) -> BudgetResult<()> {
        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        let mut categories = self.categories.write().map_err(lock_error)?;
        if let Some(parent_id) = category.parent_id {
            let parent = categories
                .get(&parent_id)
                .ok_or_else(|| BudgetError::category_not_found(parent_id.to_string()))?;
            if parent.kind != category.kind {
                return Err(BudgetError::Validation(format!(
                    "'{}' is {} but its parent '{}' is {}",
                    category.name, category.kind, parent.name, parent.kind
                )));
            }
        }
        let duplicate = categories.values().any(|c| {
            c.parent_id == category.parent_id
                && c.kind == category.kind
                && c.name.eq_ignore_ascii_case(category.name.trim())
        });
        if duplicate {
            return Err(BudgetError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        categories.insert(category.id, category);
        Ok(())
    }

    /// Insert or replace a category without checks
    pub fn upsert(&self, category: Category) -> BudgetResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        categories.insert(category.id, category);
        Ok(())
    }

    pub fn count(&self) -> BudgetResult<usize> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.len())
    }
}

impl CategorySource for CategoryRepository {
    /// Visible categories of each kind in pre-order, siblings by sort order
    /// then name. Hidden or inactive categories are left out together with
    /// everything below them.
    fn iterate(&self) -> BudgetResult<Vec<CategoryEntry>> {
        let categories = self.categories.read().map_err(lock_error)?;

        let mut children: HashMap<Option<CategoryId>, Vec<&Category>> = HashMap::new();
        for category in categories.values() {
            let parent = match category.parent_id {
                Some(parent_id) if !categories.contains_key(&parent_id) => {
                    tracing::warn!(
                        category = %category.name,
                        parent = %parent_id,
                        "parent category not found, skipping"
                    );
                    continue;
                }
                parent => parent,
            };
            children.entry(parent).or_default().push(category);
        }
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        }

        let mut entries = Vec::new();
        let mut visited = HashSet::new();
        for kind in [CategoryKind::Income, CategoryKind::Expense] {
            let roots = children.get(&None).map(Vec::as_slice).unwrap_or(&[]);
            for root in roots.iter().filter(|c| c.kind == kind) {
                walk(root, 0, &children, &mut visited, &mut entries);
            }
        }
        Ok(entries)
    }
}

fn walk(
    category: &Category,
    depth: usize,
    children: &HashMap<Option<CategoryId>, Vec<&Category>>,
    visited: &mut HashSet<CategoryId>,
    entries: &mut Vec<CategoryEntry>,
) {
    if category.hidden || category.inactive || !visited.insert(category.id) {
        return;
    }

    let below = children
        .get(&Some(category.id))
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    entries.push(CategoryEntry {
        id: category.id,
        name: category.name.clone(),
        kind: category.kind,
        depth,
        is_aggregate: !below.is_empty(),
        currency: category.currency.clone(),
    });

    for child in below {
        if child.kind != category.kind {
            tracing::warn!(
                category = %child.name,
                parent = %category.name,
                "category kind differs from its parent, skipping"
            );
            continue;
        }
        walk(child, depth + 1, children, visited, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        (temp_dir, repo)
    }

    fn names(entries: &[CategoryEntry]) -> Vec<(&str, usize)> {
        entries.iter().map(|e| (e.name.as_str(), e.depth)).collect()
    }

    #[test]
    fn test_iterate_in_tree_order() {
        let (_temp_dir, repo) = create_test_repo();
        let auto = Category::new("Auto", CategoryKind::Expense).with_sort_order(1);
        let rent = Category::new("Rent", CategoryKind::Expense).with_sort_order(0);
        let salary = Category::new("Salary", CategoryKind::Income);
        let repairs = Category::child_of("Repairs", &auto);
        let fuel = Category::child_of("Fuel", &auto);

        for c in [auto, rent, salary, repairs, fuel] {
            repo.add(c).unwrap();
        }

        let entries = repo.iterate().unwrap();
        assert_eq!(
            names(&entries),
            vec![("Salary", 0), ("Rent", 0), ("Auto", 0), ("Fuel", 1), ("Repairs", 1)]
        );
        assert!(entries[2].is_aggregate);
        assert!(!entries[3].is_aggregate);
    }

    #[test]
    fn test_iterate_skips_hidden_subtrees() {
        let (_temp_dir, repo) = create_test_repo();
        let mut auto = Category::new("Auto", CategoryKind::Expense);
        auto.inactive = true;
        let fuel = Category::child_of("Fuel", &auto);
        let mut gifts = Category::new("Gifts", CategoryKind::Expense);
        gifts.hidden = true;
        let food = Category::new("Food", CategoryKind::Expense);

        for c in [auto, fuel, gifts, food] {
            repo.add(c).unwrap();
        }

        assert_eq!(names(&repo.iterate().unwrap()), vec![("Food", 0)]);
    }

    #[test]
    fn test_iterate_skips_dangling_parent() {
        let (_temp_dir, repo) = create_test_repo();
        let ghost = Category::new("Ghost", CategoryKind::Expense);
        let orphan = Category::child_of("Orphan", &ghost);
        repo.upsert(orphan).unwrap();
        repo.upsert(Category::new("Food", CategoryKind::Expense))
            .unwrap();

        assert_eq!(names(&repo.iterate().unwrap()), vec![("Food", 0)]);
    }

    #[test]
    fn test_add_rejects_duplicates_and_bad_parents() {
        let (_temp_dir, repo) = create_test_repo();
        let salary = Category::new("Salary", CategoryKind::Income);
        repo.add(salary.clone()).unwrap();

        let err = repo
            .add(Category::new("salary", CategoryKind::Income))
            .unwrap_err();
        assert!(matches!(err, BudgetError::Duplicate { .. }));

        let mut mixed = Category::child_of("Bonus", &salary);
        mixed.kind = CategoryKind::Expense;
        assert!(matches!(
            repo.add(mixed).unwrap_err(),
            BudgetError::Validation(_)
        ));

        let ghost = Category::new("Ghost", CategoryKind::Income);
        assert!(repo
            .add(Category::child_of("Orphan", &ghost))
            .unwrap_err()
            .is_not_found());

        // Same name under a different kind is fine
        repo.add(Category::new("Salary", CategoryKind::Expense))
            .unwrap();
    }

    #[test]
    fn test_save_and_load() {
        let (temp_dir, repo) = create_test_repo();
        let housing = Category::new("Housing", CategoryKind::Expense);
        let rent = Category::child_of("Rent", &housing);
        let rent_id = rent.id;
        repo.add(housing).unwrap();
        repo.add(rent).unwrap();
        repo.save().unwrap();

        let reloaded = CategoryRepository::new(temp_dir.path().join("categories.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 2);
        assert_eq!(reloaded.get(rent_id).unwrap().unwrap().name, "Rent");
        assert_eq!(
            reloaded.get_by_name("HOUSING").unwrap().unwrap().kind,
            CategoryKind::Expense
        );
    }
}
