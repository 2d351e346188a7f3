//! JSON file helpers
//!
//! Writes go to a sibling temp file that is synced and then renamed over the
//! target, so a crash leaves either the old file or the new one.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{BudgetError, BudgetResult};

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read a JSON document, or `T::default()` when the file does not exist yet
pub fn read_json<T, P>(path: P) -> BudgetResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Write a JSON document atomically, creating parent directories as needed
pub fn write_json_atomic<T, P>(path: P, data: &T) -> BudgetResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(storage_error("replace", path, e));
    }
    Ok(())
}
