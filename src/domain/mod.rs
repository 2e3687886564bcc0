//! # Domain Module
//!
//! Entity definitions and validation rules. Nothing in here touches storage;
//! the repositories in [`crate::storage`] operate on these types.

pub mod models;

pub use models::{
    AppData, Child, Settings, SettingsUpdate, Task, TaskCategory, ValidationError,
    STORAGE_VERSION,
};
