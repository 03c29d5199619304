//! Group model
//!
//! A group is a named set of members who share expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId};

/// A group of members sharing expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Group name
    pub name: String,

    /// Members in the order they joined
    #[serde(default)]
    pub members: Vec<MemberId>,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// When the group was last modified
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group
    pub fn new(name: impl Into<String>, members: Vec<MemberId>) -> Self {
        let now = Utc::now();
        let mut group = Self {
            id: GroupId::new(),
            name: name.into(),
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        for member in members {
            group.add_member(member);
        }
        group
    }

    /// Check whether someone belongs to the group
    pub fn has_member(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    /// Add a member, returning false if they were already present
    pub fn add_member(&mut self, member: MemberId) -> bool {
        if self.has_member(&member) {
            return false;
        }
        self.members.push(member);
        self.updated_at = Utc::now();
        true
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(GroupValidationError::NameTooLong(self.name.len()));
        }

        if self.members.is_empty() {
            return Err(GroupValidationError::NoMembers);
        }

        if let Some(blank) = self.members.iter().find(|m| m.is_blank()) {
            return Err(GroupValidationError::BlankMember(blank.to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NameTooLong(usize),
    NoMembers,
    BlankMember(String),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Group name too long ({} chars, max 100)", len)
            }
            Self::NoMembers => write!(f, "A group needs at least one member"),
            Self::BlankMember(raw) => write!(f, "Member id cannot be blank: '{}'", raw),
        }
    }
}

impl std::error::Error for GroupValidationError {}
