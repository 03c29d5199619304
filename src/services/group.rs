//! Group service
//!
//! Creating groups and looking them up by name or id.

use crate::error::{SplitError, SplitResult};
use crate::models::{Group, GroupId, MemberId};
use crate::storage::Storage;

/// Service for group management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

impl<'a> GroupService<'a> {
    /// Create a new group service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new group
    ///
    /// Member ids are trimmed; blank ones are rejected and repeats dropped.
    pub fn create(&self, name: &str, members: &[String]) -> SplitResult<Group> {
        let name = name.trim();

        if self.storage.groups.get_by_name(name)?.is_some() {
            return Err(SplitError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        let mut ids = Vec::with_capacity(members.len());
        for raw in members {
            let id = MemberId::new(raw).ok_or_else(|| {
                SplitError::Validation(format!("Member id cannot be blank: '{}'", raw))
            })?;
            ids.push(id);
        }

        let group = Group::new(name, ids);
        group
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        tracing::info!(
            group = %group.id,
            name = %group.name,
            members = group.members.len(),
            "created group"
        );

        Ok(group)
    }

    /// Get a group by ID
    pub fn get(&self, id: GroupId) -> SplitResult<Option<Group>> {
        self.storage.groups.get(id)
    }

    /// Find a group by name, full id, or displayed short id
    pub fn find(&self, identifier: &str) -> SplitResult<Option<Group>> {
        if let Some(group) = self.storage.groups.get_by_name(identifier)? {
            return Ok(Some(group));
        }

        if let Ok(id) = identifier.trim().parse::<GroupId>() {
            return self.storage.groups.get(id);
        }

        let short = identifier.trim();
        Ok(self
            .storage
            .groups
            .get_all()?
            .into_iter()
            .find(|g| g.id.to_string() == short))
    }

    /// Find a group or fail with a not-found error
    pub fn require(&self, identifier: &str) -> SplitResult<Group> {
        self.find(identifier)?
            .ok_or_else(|| SplitError::group_not_found(identifier))
    }

    /// List all groups
    pub fn list(&self) -> SplitResult<Vec<Group>> {
        self.storage.groups.get_all()
    }
}
