//! Custom error types for SplitIt
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::{MemberId, Money};

/// The main error type for SplitIt operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Non-positive or unparseable expense total
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Custom shares do not add up to the expense total
    #[error("Shares sum to {sum} but the expense total is {expected}")]
    ShareMismatch { sum: Money, expected: Money },

    /// A split was requested with nobody selected
    #[error("At least one participant is required to split an expense")]
    EmptyParticipantSet,

    /// A custom share below zero
    #[error("Share for '{member}' cannot be negative: {amount}")]
    NegativeShare { member: MemberId, amount: Money },

    /// A share assigned to someone outside the participant set
    #[error("'{0}' is not a participant of this expense")]
    UnknownParticipant(MemberId),

    /// A date value that could not be resolved to a calendar day
    #[error("Unparseable date: {0}")]
    UnparseableDate(String),
}

impl SplitError {
    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for members
    pub fn member_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Member",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error raised while splitting an expense
    pub fn is_split_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::ShareMismatch { .. }
                | Self::EmptyParticipantSet
                | Self::NegativeShare { .. }
                | Self::UnknownParticipant(_)
        )
    }
}

impl From<std::io::Error> for SplitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for SplitError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for SplitIt operations
pub type SplitResult<T> = Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SplitError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = SplitError::group_not_found("Flatmates");
        assert_eq!(err.to_string(), "Group not found: Flatmates");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_share_mismatch_error() {
        let err = SplitError::ShareMismatch {
            sum: Money::from_cents(9000),
            expected: Money::from_cents(10000),
        };
        assert_eq!(
            err.to_string(),
            "Shares sum to $90.00 but the expense total is $100.00"
        );
        assert!(err.is_split_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let split_err: SplitError = io_err.into();
        assert!(matches!(split_err, SplitError::Io(_)));
        assert!(!split_err.is_split_error());
    }
}
