//! Storage layer for SplitIt
//!
//! JSON file storage with atomic writes. Each repository owns one file under
//! the data directory and keeps its contents in memory between `load` and
//! `save`.

pub mod expenses;
pub mod file_io;
pub mod groups;
pub mod init;
pub mod settlements;

pub use expenses::{document_period, ExpenseRepository};
pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use init::initialize_storage;
pub use settlements::SettlementRepository;

use crate::config::paths::SplitPaths;
use crate::error::SplitError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SplitPaths,
    pub groups: GroupRepository,
    pub expenses: ExpenseRepository,
    pub settlements: SettlementRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SplitPaths) -> Result<Self, SplitError> {
        paths.ensure_directories()?;

        Ok(Self {
            groups: GroupRepository::new(paths.groups_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            settlements: SettlementRepository::new(paths.settlements_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SplitPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SplitError> {
        self.groups.load()?;
        self.expenses.load()?;
        self.settlements.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SplitError> {
        self.groups.save()?;
        self.expenses.save()?;
        self.settlements.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
