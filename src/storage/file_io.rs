//! File I/O utilities with atomic writes
//!
//! Whole-file JSON reads and writes. Writes go to a temp file that is renamed
//! over the target, so a crash never leaves a half-written data file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::SplitError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, SplitError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| SplitError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SplitError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Records read from a list-valued file
///
/// Elements that did not decode are kept verbatim in `rejected` so they can
/// be written back untouched.
#[derive(Debug)]
pub struct RecordBatch<T> {
    pub records: Vec<T>,
    pub rejected: Vec<Value>,
}

impl<T> Default for RecordBatch<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Read the array stored under `key`, decoding each element on its own
///
/// An element that does not decode as `T` lands in [`RecordBatch::rejected`]
/// instead of failing the whole file. A missing file or missing key reads as
/// an empty batch; a file that is not JSON at all is still an error.
pub fn read_json_records<T, P>(path: P, key: &str) -> Result<RecordBatch<T>, SplitError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let mut root: Value = match read_json::<Option<Value>, _>(path)? {
        Some(value) => value,
        None => return Ok(RecordBatch::default()),
    };

    let items = match root.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(RecordBatch::default()),
        Some(other) => {
            return Err(SplitError::Storage(format!(
                "Expected a list under '{}', found {}",
                key,
                json_kind(&other)
            )))
        }
    };

    let mut batch = RecordBatch::default();
    for item in items {
        match serde_json::from_value(item.clone()) {
            Ok(record) => batch.records.push(record),
            Err(_) => batch.rejected.push(item),
        }
    }
    Ok(batch)
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), SplitError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SplitError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| SplitError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| SplitError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| SplitError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| SplitError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SplitError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
