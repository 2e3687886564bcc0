//! src/domain/models/mod.rs

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod app_data;
pub mod child;
pub mod settings;
pub mod task;

pub use app_data::{AppData, STORAGE_VERSION};
pub use child::Child;
pub use settings::{Settings, SettingsUpdate};
pub use task::{Task, TaskCategory};

/// Current time truncated to millisecond precision, the resolution the blob
/// stores timestamps at. Keeps freshly created entities equal to their
/// reloaded form.
pub(crate) fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap_or_else(Utc::now)
}

/// Validation failure for user-supplied entity fields.
///
/// Messages are the user-facing strings shown by the app, so they stay in the
/// product language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("İsim 1-50 karakter arasında olmalıdır")]
    ChildName,
    #[error("Sınıf 1-12 arasında olmalıdır")]
    Grade,
    #[error("Ders adı 1-30 karakter arasında olmalıdır")]
    Subject,
    #[error("Açıklama maksimum 200 karakter olmalıdır")]
    Description,
    #[error("Geçerli bir tarih seçiniz")]
    DueDate,
}
