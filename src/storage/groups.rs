//! Group repository for JSON storage
//!
//! Manages loading and saving groups to groups.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Group, GroupId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable group data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GroupData {
    groups: Vec<Group>,
}

/// Repository for group persistence
pub struct GroupRepository {
    path: PathBuf,
    data: RwLock<HashMap<GroupId, Group>>,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load groups from disk
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: GroupData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for group in file_data.groups {
            data.insert(group.id, group);
        }

        Ok(())
    }

    /// Save groups to disk
    pub fn save(&self) -> Result<(), SplitError> {
        let groups = self.get_all()?;
        write_json_atomic(&self.path, &GroupData { groups })
    }

    /// Get a group by ID
    pub fn get(&self, id: GroupId) -> Result<Option<Group>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all groups, ordered by name
    pub fn get_all(&self) -> Result<Vec<Group>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut groups: Vec<_> = data.values().cloned().collect();
        groups.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(groups)
    }

    /// Get a group by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Group>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|g| g.name.trim().to_lowercase() == name)
            .cloned())
    }

    /// Insert or update a group
    pub fn upsert(&self, group: Group) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(group.id, group);
        Ok(())
    }

    /// Number of stored groups
    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberId;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GroupRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("groups.json");
        let repo = GroupRepository::new(path);
        (temp_dir, repo)
    }

    fn members(names: &[&str]) -> Vec<MemberId> {
        names.iter().map(|n| MemberId::from(*n)).collect()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let group = Group::new("Flat", members(&["alice", "bob"]));
        let id = group.id;
        repo.upsert(group).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Flat");
        assert_eq!(retrieved.members, members(&["alice", "bob"]));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Group::new("Trip", members(&["carol"]))).unwrap();
        repo.upsert(Group::new("Flat", members(&["alice", "bob"])))
            .unwrap();
        repo.save().unwrap();

        let repo2 = GroupRepository::new(temp_dir.path().join("groups.json"));
        repo2.load().unwrap();

        let names: Vec<_> = repo2.get_all().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, ["Flat", "Trip"]);
    }

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Group::new("Ski Trip", members(&["alice"]))).unwrap();

        assert!(repo.get_by_name("ski trip").unwrap().is_some());
        assert!(repo.get_by_name("  SKI TRIP ").unwrap().is_some());
        assert!(repo.get_by_name("beach").unwrap().is_none());
    }
}
