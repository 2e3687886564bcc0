//! src/domain/models/child.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now_millis, ValidationError};

/// Domain model representing a child in the system.
///
/// Serialized field names are camelCase to match the persisted blob format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    /// School grade, 1 through 12.
    pub grade: u8,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// Create a new child with a fresh id and creation timestamp.
    /// The name is stored trimmed.
    pub fn new(name: &str, grade: u8) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            grade,
            created_at: now_millis(),
        }
    }
}

/// A child name is valid when it is 1-50 characters after trimming.
pub fn is_valid_child_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (1..=50).contains(&len)
}

pub fn is_valid_grade(grade: u8) -> bool {
    (1..=12).contains(&grade)
}

/// Validate the fields of a prospective child.
pub fn validate_child(name: &str, grade: u8) -> Result<(), ValidationError> {
    if !is_valid_child_name(name) {
        return Err(ValidationError::ChildName);
    }
    if !is_valid_grade(grade) {
        return Err(ValidationError::Grade);
    }
    Ok(())
}
