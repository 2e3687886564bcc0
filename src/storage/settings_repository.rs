//! # Settings Repository
//!
//! Read and shallow-merge of persisted user settings.

use std::sync::Arc;

use crate::domain::models::{Settings, SettingsUpdate};

use super::engine::StorageEngine;

#[derive(Clone)]
pub struct SettingsRepository {
    engine: Arc<StorageEngine>,
}

impl SettingsRepository {
    pub fn new(engine: Arc<StorageEngine>) -> Self {
        Self { engine }
    }

    pub fn get_settings(&self) -> Settings {
        self.engine.load().settings
    }

    /// Merge only the provided fields into the persisted settings.
    pub fn update_settings(&self, update: SettingsUpdate) -> bool {
        let mut data = self.engine.load();
        update.apply_to(&mut data.settings);
        self.engine.save(&data)
    }
}
