//! Settlement repository for JSON storage
//!
//! Manages loading and saving recorded payments to settlements.json

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{GroupId, PeriodKey, SettlementRecord};

use super::file_io::{read_json, write_json_atomic};

/// Serializable settlement data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<SettlementRecord>,
}

/// Repository for recorded settlements
pub struct SettlementRepository {
    path: PathBuf,
    data: RwLock<Vec<SettlementRecord>>,
}

impl SettlementRepository {
    /// Create a new settlement repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load settlements from disk
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: SettlementData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.settlements;

        Ok(())
    }

    /// Save settlements to disk, oldest first
    pub fn save(&self) -> Result<(), SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut settlements = data.clone();
        settlements.sort_by_key(|s| s.recorded_at);

        write_json_atomic(&self.path, &SettlementData { settlements })
    }

    /// Get the settlements recorded for a group in a period, oldest first
    pub fn get_by_period(
        &self,
        group_id: GroupId,
        period: PeriodKey,
    ) -> Result<Vec<SettlementRecord>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut settlements: Vec<_> = data
            .iter()
            .filter(|s| s.group_id == group_id && s.period == period)
            .cloned()
            .collect();
        settlements.sort_by_key(|s| s.recorded_at);
        Ok(settlements)
    }

    /// Get every settlement recorded for a group, oldest first
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<SettlementRecord>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut settlements: Vec<_> = data
            .iter()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        settlements.sort_by_key(|s| s.recorded_at);
        Ok(settlements)
    }

    /// Append a settlement
    pub fn insert(&self, record: SettlementRecord) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if data.iter().any(|s| s.id == record.id) {
            return Err(SplitError::Duplicate {
                entity_type: "Settlement",
                identifier: record.id.to_string(),
            });
        }

        data.push(record);
        Ok(())
    }
}
