//! Expense repository for JSON storage
//!
//! Manages loading and saving expense documents to expenses.json. Documents
//! are kept as stored, malformed ones included; entries that are not even
//! decodable as a document are carried through a save untouched.

use chrono::FixedOffset;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::ledger::try_period_key_of_in;
use crate::models::{ExpenseDocument, ExpenseId, GroupId, PeriodKey};

use super::file_io::{read_json_records, write_json_atomic};

const RECORD_KEY: &str = "expenses";

#[derive(serde::Serialize)]
struct ExpenseData {
    expenses: Vec<Value>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<Vec<ExpenseDocument>>,
    /// Raw entries that failed to decode, preserved across saves
    unreadable: RwLock<Vec<Value>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            unreadable: RwLock::new(Vec::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), SplitError> {
        let batch = read_json_records::<ExpenseDocument, _>(&self.path, RECORD_KEY)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut unreadable = self
            .unreadable
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = batch.records;
        *unreadable = batch.rejected;

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let unreadable = self
            .unreadable
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses = Vec::with_capacity(data.len() + unreadable.len());
        for document in data.iter() {
            expenses.push(serde_json::to_value(document)?);
        }
        expenses.extend(unreadable.iter().cloned());

        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<ExpenseDocument>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|doc| doc.id == Some(id)).cloned())
    }

    /// Get all expense documents in stored order
    pub fn get_all(&self) -> Result<Vec<ExpenseDocument>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Get every document belonging to a group
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<ExpenseDocument>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|doc| doc.group_id == Some(group_id))
            .cloned()
            .collect())
    }

    /// Get the documents of a group that fall in a period
    ///
    /// See [`document_period`] for how a document is assigned a period.
    pub fn get_by_period(
        &self,
        group_id: GroupId,
        period: PeriodKey,
        zone: FixedOffset,
    ) -> Result<Vec<ExpenseDocument>, SplitError> {
        Ok(self
            .get_by_group(group_id)?
            .into_iter()
            .filter(|doc| document_period(doc, zone) == Some(period))
            .collect())
    }

    /// Append a document
    pub fn insert(&self, document: ExpenseDocument) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(id) = document.id {
            if data.iter().any(|doc| doc.id == Some(id)) {
                return Err(SplitError::Duplicate {
                    entity_type: "Expense",
                    identifier: id.to_string(),
                });
            }
        }

        data.push(document);
        Ok(())
    }

    /// Number of decodable documents
    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    /// Number of stored entries that could not be decoded
    pub fn unreadable_count(&self) -> Result<usize, SplitError> {
        let unreadable = self
            .unreadable
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(unreadable.len())
    }
}

/// The period a stored document belongs to
///
/// The expense date wins when it can be resolved; otherwise the stored
/// period tag is used. A document with neither belongs to no period.
pub fn document_period(document: &ExpenseDocument, zone: FixedOffset) -> Option<PeriodKey> {
    document
        .expense_date
        .as_ref()
        .and_then(|date| try_period_key_of_in(date, zone).ok())
        .or(document.period)
}
