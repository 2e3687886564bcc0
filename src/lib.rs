//! # Homework Tracker Core
//!
//! Tracks homework tasks per child on a single device. All durable state
//! lives in one versioned blob that every mutation rewrites whole, and a
//! polling scheduler fires at most one reminder notification per calendar
//! day.
//!
//! Layering, leaves first:
//!
//! - [`domain`] — entities and validation.
//! - [`storage`] — the key-value seam, the versioned blob engine with its
//!   v1 -> v2 migration, and the typed repositories.
//! - [`scheduler`] — the reminder state machine, driven by the external
//!   [`notifications`] capability.
//! - [`push`] — types shared with the remote reminder path.
//!
//! [`App`] wires it together for a host. Known limitation: two unsynchronized
//! writers (say, two open tabs over the same directory) exhibit lost-update,
//! because the whole blob is the unit of durability and there is no
//! compare-and-swap on writes.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod notifications;
pub mod push;
pub mod scheduler;
pub mod storage;

pub use domain::models::{
    AppData, Child, Settings, SettingsUpdate, Task, TaskCategory, ValidationError, STORAGE_VERSION,
};
pub use notifications::{LogNotifier, NotificationCapability, PermissionState, ReminderNotification};
pub use scheduler::{ReminderScheduler, SchedulerState, REMINDER_MARKER_KEY};
pub use storage::{
    ChildRepository, FileStore, KeyValueStore, SettingsRepository, StorageEngine, TaskRepository,
    DATA_KEY,
};

/// Application core: store, engine, and repositories wired together.
pub struct App {
    pub children: ChildRepository,
    pub tasks: TaskRepository,
    pub settings: SettingsRepository,
    engine: Arc<StorageEngine>,
    store: Arc<dyn KeyValueStore>,
}

impl App {
    /// Open the app state under `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let store = Arc::new(FileStore::new(data_dir.as_ref())?);
        Ok(Self::with_store(store))
    }

    /// Build the core over any durable key-value store.
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let engine = Arc::new(StorageEngine::new(store.clone()));
        Self {
            children: ChildRepository::new(engine.clone()),
            tasks: TaskRepository::new(engine.clone()),
            settings: SettingsRepository::new(engine.clone()),
            engine,
            store,
        }
    }

    /// Direct access to the blob engine.
    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.engine
    }

    /// Construct a reminder scheduler over this app's storage.
    ///
    /// The host owns its lifecycle: call [`ReminderScheduler::start`] on
    /// startup and [`ReminderScheduler::stop`] on shutdown.
    pub fn reminder_scheduler(&self, notifier: Arc<dyn NotificationCapability>) -> ReminderScheduler {
        ReminderScheduler::new(self.engine.clone(), self.store.clone(), notifier)
    }
}
