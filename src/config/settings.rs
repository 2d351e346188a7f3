//! User settings for budget-grid
//!
//! Stored as `config.json` in the base directory. Every field has a default
//! so older or hand-edited files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::GridPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::CurrencyFormat;
use crate::storage::file_io::write_json_atomic;

/// User settings for budget-grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Budget opened when none is named on the command line
    #[serde(default = "default_budget_name")]
    pub budget_name: String,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Digits after the decimal separator for amounts
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,

    /// `tracing` filter directive used when `BUDGET_GRID_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_budget_name() -> String {
    "Budget".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            budget_name: default_budget_name(),
            currency_symbol: default_currency(),
            decimal_places: default_decimal_places(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &GridPaths) -> BudgetResult<Self> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| BudgetError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GridPaths) -> BudgetResult<()> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    pub fn validate(&self) -> BudgetResult<()> {
        if self.budget_name.trim().is_empty() {
            return Err(BudgetError::Config("budget_name cannot be empty".into()));
        }
        if self.decimal_places > 6 {
            return Err(BudgetError::Config(format!(
                "decimal_places must be between 0 and 6, got {}",
                self.decimal_places
            )));
        }
        Ok(())
    }

    /// Formatting and parsing rules for amounts
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.currency_symbol.clone(), self.decimal_places)
    }

    /// Update one setting by its key, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> BudgetResult<()> {
        match key {
            "budget_name" => self.budget_name = value.trim().to_string(),
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "decimal_places" => {
                self.decimal_places = value.trim().parse().map_err(|_| {
                    BudgetError::Config(format!("decimal_places must be a number, got '{}'", value))
                })?
            }
            "log_filter" => self.log_filter = value.trim().to_string(),
            other => {
                return Err(BudgetError::Config(format!(
                    "unknown setting '{}' (expected budget_name, currency_symbol, decimal_places or log_filter)",
                    other
                )))
            }
        }
        self.validate()
    }
}
