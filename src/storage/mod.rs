//! # Storage Module
//!
//! Persistence for the homework tracker. Three layers:
//!
//! - [`traits::KeyValueStore`] — the durable key-value seam. The production
//!   backend is [`file_store::FileStore`] (one file per key); tests substitute
//!   in-memory or failure-injecting stores.
//! - [`engine::StorageEngine`] — load/save/migrate of the single versioned
//!   blob. Read problems resolve to an empty blob, write problems to a
//!   `false` return; the engine never propagates errors.
//! - Repositories — typed CRUD on children, tasks, and settings. Every
//!   mutation is an independent load, mutate, save pass over the whole blob.

pub mod child_repository;
pub mod engine;
pub mod file_store;
pub mod settings_repository;
pub mod task_repository;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use child_repository::ChildRepository;
pub use engine::{StorageEngine, DATA_KEY};
pub use file_store::FileStore;
pub use settings_repository::SettingsRepository;
pub use task_repository::TaskRepository;
pub use traits::KeyValueStore;
