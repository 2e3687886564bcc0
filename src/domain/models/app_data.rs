//! src/domain/models/app_data.rs

use serde::{Deserialize, Serialize};

use super::{Child, Settings, Task};

/// Current schema version of the persisted blob.
///
/// v1 -> v2 added `taskCategory` to every task; see the migration in
/// [`crate::storage::engine`].
pub const STORAGE_VERSION: u32 = 2;

/// The single persisted blob holding all durable application state.
///
/// Every mutating operation loads the whole blob, produces a new value, and
/// writes the whole blob back. There is no finer-grained unit of durability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    pub children: Vec<Child>,
    pub tasks: Vec<Task>,
    pub settings: Settings,
    pub version: u32,
}

impl AppData {
    /// Fresh empty blob at the current schema version.
    pub fn empty() -> Self {
        Self {
            children: Vec::new(),
            tasks: Vec::new(),
            settings: Settings::default(),
            version: STORAGE_VERSION,
        }
    }
}
