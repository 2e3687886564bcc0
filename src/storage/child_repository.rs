//! # Child Repository
//!
//! Typed CRUD for children on top of the storage engine. Every mutation is a
//! full load, mutate, save pass; failures come back as `None`/`false`, never
//! as errors.

use log::{info, warn};
use std::sync::Arc;

use crate::domain::models::child::{validate_child, Child};

use super::engine::StorageEngine;

#[derive(Clone)]
pub struct ChildRepository {
    engine: Arc<StorageEngine>,
}

impl ChildRepository {
    pub fn new(engine: Arc<StorageEngine>) -> Self {
        Self { engine }
    }

    /// Create a new child.
    ///
    /// Returns `None` when validation fails or the save does not stick.
    pub fn add_child(&self, name: &str, grade: u8) -> Option<Child> {
        if let Err(e) = validate_child(name, grade) {
            warn!("Rejected child: {e}");
            return None;
        }

        let mut data = self.engine.load();
        let child = Child::new(name, grade);
        data.children.push(child.clone());

        if !self.engine.save(&data) {
            return None;
        }
        info!("Created child {} ({})", child.name, child.id);
        Some(child)
    }

    /// Replace name and grade of an existing child. `false` if the id is
    /// unknown or the save fails.
    pub fn update_child(&self, child_id: &str, name: &str, grade: u8) -> bool {
        let mut data = self.engine.load();
        let Some(child) = data.children.iter_mut().find(|c| c.id == child_id) else {
            return false;
        };
        child.name = name.trim().to_string();
        child.grade = grade;
        self.engine.save(&data)
    }

    /// Delete a child and cascade: every task of that child is removed, and a
    /// matching `last_selected_child_id` is cleared, all in one save.
    pub fn delete_child(&self, child_id: &str) -> bool {
        let mut data = self.engine.load();

        data.children.retain(|c| c.id != child_id);
        data.tasks.retain(|t| t.child_id != child_id);
        if data.settings.last_selected_child_id.as_deref() == Some(child_id) {
            data.settings.last_selected_child_id = None;
        }

        self.engine.save(&data)
    }

    /// All children, first-added first.
    pub fn get_children(&self) -> Vec<Child> {
        let mut children = self.engine.load().children;
        children.sort_by_key(|c| c.created_at);
        children
    }

    pub fn get_child_by_id(&self, child_id: &str) -> Option<Child> {
        self.engine
            .load()
            .children
            .into_iter()
            .find(|c| c.id == child_id)
    }
}
