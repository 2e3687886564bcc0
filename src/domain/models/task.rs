//! src/domain/models/task.rs

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now_millis, ValidationError};

/// Due dates are fixed-width ISO dates so lexicographic comparison equals
/// chronological order.
static DUE_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));

/// Domain model representing a homework task assigned to a child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Id of the child this task belongs to. Checked against an existing
    /// child at creation time only.
    pub child_id: String,
    pub subject: String,
    pub description: String,
    /// Fixed-width "YYYY-MM-DD" date string.
    pub due_date: String,
    pub completed: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub task_category: TaskCategory,
}

impl Task {
    /// Create a new incomplete task with a fresh id and creation timestamp.
    /// Subject and description are stored trimmed.
    pub fn new(
        child_id: &str,
        subject: &str,
        description: &str,
        due_date: &str,
        task_category: TaskCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            child_id: child_id.to_string(),
            subject: subject.trim().to_string(),
            description: description.trim().to_string(),
            due_date: due_date.to_string(),
            completed: false,
            created_at: now_millis(),
            task_category,
        }
    }
}

/// Category of a homework task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    #[default]
    GeneralHomework,
    WrittenExam,
    OralExam,
    Project,
    ActivityAssignment,
    Reading,
    Research,
    Presentation,
}

impl TaskCategory {
    /// User-facing category name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskCategory::GeneralHomework => "Genel Ödev",
            TaskCategory::WrittenExam => "Yazılı",
            TaskCategory::OralExam => "Sözlü",
            TaskCategory::Project => "Proje",
            TaskCategory::ActivityAssignment => "Etkinlik",
            TaskCategory::Reading => "Okuma",
            TaskCategory::Research => "Araştırma",
            TaskCategory::Presentation => "Sunum",
        }
    }

    /// Weight applied when scoring completed work of this category.
    pub fn point_multiplier(&self) -> f64 {
        match self {
            TaskCategory::GeneralHomework => 1.0,
            TaskCategory::WrittenExam => 2.0,
            TaskCategory::OralExam => 1.5,
            TaskCategory::Project => 2.5,
            TaskCategory::ActivityAssignment => 1.2,
            TaskCategory::Reading => 1.0,
            TaskCategory::Research => 1.8,
            TaskCategory::Presentation => 2.0,
        }
    }

    /// All categories, in presentation order.
    pub fn all() -> [TaskCategory; 8] {
        [
            TaskCategory::GeneralHomework,
            TaskCategory::WrittenExam,
            TaskCategory::OralExam,
            TaskCategory::Project,
            TaskCategory::ActivityAssignment,
            TaskCategory::Reading,
            TaskCategory::Research,
            TaskCategory::Presentation,
        ]
    }
}

/// A subject is valid when it is 1-30 characters after trimming.
pub fn is_valid_subject(subject: &str) -> bool {
    let len = subject.trim().chars().count();
    (1..=30).contains(&len)
}

pub fn is_valid_description(description: &str) -> bool {
    description.chars().count() <= 200
}

/// A due date must match the fixed-width pattern and name a real calendar day.
pub fn is_valid_due_date(due_date: &str) -> bool {
    if !DUE_DATE_RE.is_match(due_date) {
        return false;
    }
    NaiveDate::parse_from_str(due_date, "%Y-%m-%d").is_ok()
}

/// Validate the user-supplied fields of a prospective task.
pub fn validate_task(subject: &str, description: &str, due_date: &str) -> Result<(), ValidationError> {
    if !is_valid_subject(subject) {
        return Err(ValidationError::Subject);
    }
    if !is_valid_description(description) {
        return Err(ValidationError::Description);
    }
    if !is_valid_due_date(due_date) {
        return Err(ValidationError::DueDate);
    }
    Ok(())
}
