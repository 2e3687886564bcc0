//! Test utilities for storage and scheduler tests.
//!
//! `TestHelper` wires a real [`FileStore`] in a temporary directory that is
//! removed when the helper drops, even if the test panics. `MemoryStore`
//! offers a switchable write-failure mode for quota-style error paths.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::domain::models::{Task, TaskCategory};

use super::child_repository::ChildRepository;
use super::engine::StorageEngine;
use super::file_store::FileStore;
use super::settings_repository::SettingsRepository;
use super::task_repository::TaskRepository;
use super::traits::KeyValueStore;

/// Repositories over a fresh temporary file store.
pub struct TestHelper {
    pub store: Arc<FileStore>,
    pub engine: Arc<StorageEngine>,
    pub children: ChildRepository,
    pub tasks: TaskRepository,
    pub settings: SettingsRepository,
    _temp_dir: TempDir, // keeps the directory alive for the test's duration
}

impl TestHelper {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = Arc::new(FileStore::new(temp_dir.path())?);
        let engine = Arc::new(StorageEngine::new(store.clone()));
        Ok(Self {
            store,
            engine: engine.clone(),
            children: ChildRepository::new(engine.clone()),
            tasks: TaskRepository::new(engine.clone()),
            settings: SettingsRepository::new(engine),
            _temp_dir: temp_dir,
        })
    }

    /// Create a valid task for `child_id`, panicking if creation fails.
    pub fn add_task(&self, child_id: &str, subject: &str, due_date: &str) -> Task {
        self.tasks
            .add_task(child_id, subject, "", due_date, TaskCategory::default())
            .expect("test task should be accepted")
    }
}

/// Repositories over a [`MemoryStore`], for exercising write-failure paths.
pub struct MemoryHelper {
    pub store: Arc<MemoryStore>,
    pub engine: Arc<StorageEngine>,
    pub children: ChildRepository,
    pub tasks: TaskRepository,
    pub settings: SettingsRepository,
}

impl MemoryHelper {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(StorageEngine::new(store.clone()));
        Self {
            store,
            engine: engine.clone(),
            children: ChildRepository::new(engine.clone()),
            tasks: TaskRepository::new(engine.clone()),
            settings: SettingsRepository::new(engine),
        }
    }
}

/// In-memory [`KeyValueStore`] with a switchable write-failure mode.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, every `set` fails the way a full store would.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().expect("store lock").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("storage quota exceeded"));
        }
        self.values
            .lock()
            .expect("store lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().expect("store lock").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_directory_is_cleaned_up_on_drop() -> Result<()> {
        let base_path;
        {
            let helper = TestHelper::new()?;
            base_path = helper.store.base_dir().to_path_buf();
            assert!(base_path.exists());
        }
        assert!(!base_path.exists());
        Ok(())
    }

    #[test]
    fn memory_store_write_failure_is_switchable() -> Result<()> {
        let store = MemoryStore::new();
        store.set("k", "v")?;
        store.fail_writes(true);
        assert!(store.set("k", "v2").is_err());
        // Reads keep working and still see the last good value.
        assert_eq!(store.get("k")?.as_deref(), Some("v"));
        store.fail_writes(false);
        store.set("k", "v3")?;
        assert_eq!(store.get("k")?.as_deref(), Some("v3"));
        Ok(())
    }
}
