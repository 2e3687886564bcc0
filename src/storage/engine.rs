//! # Storage Engine
//!
//! Load/save/migrate of the single versioned blob. The engine owns the
//! data-loss policy: anything unreadable (missing key, corrupt JSON, unknown
//! schema version) resolves to a fresh empty blob, and write failures are
//! reported as `false`. Nothing here returns an error to callers.

use log::{error, info, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::models::{AppData, STORAGE_VERSION};

use super::traits::KeyValueStore;

/// Key under which the serialized [`AppData`] blob lives.
pub const DATA_KEY: &str = "homework-tracker-data";

/// Engine for the versioned application blob.
#[derive(Clone)]
pub struct StorageEngine {
    store: Arc<dyn KeyValueStore>,
}

impl StorageEngine {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the blob, migrating or resetting as needed.
    ///
    /// A known older version is migrated in place and persisted immediately so
    /// the migration cost is paid once. An unrecognized version resets to an
    /// empty blob; that data loss is deliberate policy.
    pub fn load(&self) -> AppData {
        let raw = match self.store.get(DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AppData::empty(),
            Err(e) => {
                error!("Failed to read stored data: {e:#}");
                return AppData::empty();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!("Stored data is not valid JSON, resetting: {e}");
                return AppData::empty();
            }
        };

        match value.get("version").and_then(Value::as_u64) {
            Some(version) if version == u64::from(STORAGE_VERSION) => {
                match serde_json::from_value(value) {
                    Ok(data) => data,
                    Err(e) => {
                        error!("Stored data does not match schema v{STORAGE_VERSION}, resetting: {e}");
                        AppData::empty()
                    }
                }
            }
            Some(1) => self.migrate_from_v1(value),
            Some(other) => {
                warn!("Unknown storage version {other}, resetting data");
                AppData::empty()
            }
            None => {
                warn!("Stored data has no version tag, resetting data");
                AppData::empty()
            }
        }
    }

    /// Serialize and write the whole blob in one call.
    ///
    /// Returns `false` on any failure; the attempted change did not durably
    /// occur and the caller may retry.
    pub fn save(&self, data: &AppData) -> bool {
        let serialized = match serde_json::to_string(data) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("Failed to serialize data: {e}");
                return false;
            }
        };
        match self.store.set(DATA_KEY, &serialized) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save data: {e:#}");
                false
            }
        }
    }

    /// Remove the persisted blob entirely. Best-effort.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(DATA_KEY) {
            warn!("Failed to clear stored data: {e:#}");
        }
    }

    fn migrate_from_v1(&self, value: Value) -> AppData {
        info!("Migrating stored data from v1 to v{STORAGE_VERSION}");
        let migrated = migrate_v1_to_v2(value);
        match serde_json::from_value::<AppData>(migrated) {
            Ok(data) => {
                // A failed write-back just means the migration re-runs on the
                // next load; adding a default field is idempotent.
                if !self.save(&data) {
                    warn!("Failed to persist migrated data; migration will re-run on next load");
                }
                data
            }
            Err(e) => {
                error!("Migrated data does not match schema v{STORAGE_VERSION}, resetting: {e}");
                AppData::empty()
            }
        }
    }
}

/// v1 -> v2: every task gains `taskCategory`, defaulting to general homework.
fn migrate_v1_to_v2(mut value: Value) -> Value {
    if let Some(tasks) = value.get_mut("tasks").and_then(Value::as_array_mut) {
        for task in tasks {
            if let Some(task) = task.as_object_mut() {
                task.entry("taskCategory")
                    .or_insert_with(|| Value::String("general_homework".to_string()));
            }
        }
    }
    if let Some(root) = value.as_object_mut() {
        root.insert("version".to_string(), Value::from(2u32));
    }
    value
}
