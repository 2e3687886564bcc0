//! src/domain/models/settings.rs

use serde::{Deserialize, Serialize};

/// User settings persisted inside the blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub reminder_enabled: bool,
    /// "HH:MM" local time, 24-hour clock.
    pub reminder_time: String,
    pub last_selected_child_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_enabled: false,
            reminder_time: "18:00".to_string(),
            last_selected_child_id: None,
        }
    }
}

/// Partial settings patch. Fields left as `None` keep their persisted value.
///
/// `last_selected_child_id` is doubly optional so that clearing the selection
/// (`Some(None)`) is distinct from leaving it untouched (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<String>,
    pub last_selected_child_id: Option<Option<String>>,
}

impl SettingsUpdate {
    /// Shallow-merge this patch into existing settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(enabled) = self.reminder_enabled {
            settings.reminder_enabled = enabled;
        }
        if let Some(time) = &self.reminder_time {
            settings.reminder_time = time.clone();
        }
        if let Some(selection) = &self.last_selected_child_id {
            settings.last_selected_child_id = selection.clone();
        }
    }
}
