//! # Task Repository
//!
//! Typed CRUD for homework tasks. Creation is the one place referential
//! integrity is enforced: a task can only be added for a child that exists at
//! that moment. Ordering rules live in [`TaskRepository::get_tasks_by_child`].

use log::{info, warn};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::models::task::{validate_task, Task, TaskCategory};

use super::engine::StorageEngine;

#[derive(Clone)]
pub struct TaskRepository {
    engine: Arc<StorageEngine>,
}

impl TaskRepository {
    pub fn new(engine: Arc<StorageEngine>) -> Self {
        Self { engine }
    }

    /// Create a new task for an existing child.
    ///
    /// Returns `None` without touching storage when the child does not exist
    /// or a field fails validation, and `None` when the save does not stick.
    pub fn add_task(
        &self,
        child_id: &str,
        subject: &str,
        description: &str,
        due_date: &str,
        task_category: TaskCategory,
    ) -> Option<Task> {
        let mut data = self.engine.load();

        if !data.children.iter().any(|c| c.id == child_id) {
            warn!("Rejected task for unknown child {child_id}");
            return None;
        }
        if let Err(e) = validate_task(subject, description, due_date) {
            warn!("Rejected task: {e}");
            return None;
        }

        let task = Task::new(child_id, subject, description, due_date, task_category);
        data.tasks.push(task.clone());

        if !self.engine.save(&data) {
            return None;
        }
        info!("Created task {} ({})", task.subject, task.id);
        Some(task)
    }

    /// Replace the editable fields of an existing task. `false` if the id is
    /// unknown or the save fails.
    pub fn update_task(
        &self,
        task_id: &str,
        subject: &str,
        description: &str,
        due_date: &str,
        task_category: TaskCategory,
    ) -> bool {
        let mut data = self.engine.load();
        let Some(task) = data.tasks.iter_mut().find(|t| t.id == task_id) else {
            return false;
        };
        task.subject = subject.trim().to_string();
        task.description = description.trim().to_string();
        task.due_date = due_date.to_string();
        task.task_category = task_category;
        self.engine.save(&data)
    }

    pub fn delete_task(&self, task_id: &str) -> bool {
        let mut data = self.engine.load();
        data.tasks.retain(|t| t.id != task_id);
        self.engine.save(&data)
    }

    /// Flip the completion flag. `false` if the id is unknown or the save
    /// fails.
    pub fn toggle_task_completion(&self, task_id: &str) -> bool {
        let mut data = self.engine.load();
        let Some(task) = data.tasks.iter_mut().find(|t| t.id == task_id) else {
            return false;
        };
        task.completed = !task.completed;
        self.engine.save(&data)
    }

    /// Tasks of one child, incomplete before completed, then nearest due date
    /// first, then newest-created first among equal dates.
    pub fn get_tasks_by_child(&self, child_id: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .engine
            .load()
            .tasks
            .into_iter()
            .filter(|t| t.child_id == child_id)
            .collect();

        tasks.sort_by(compare_tasks);
        tasks
    }

    /// Tasks of one child due on an exact date.
    pub fn get_tasks_by_date(&self, child_id: &str, date: &str) -> Vec<Task> {
        self.engine
            .load()
            .tasks
            .into_iter()
            .filter(|t| t.child_id == child_id && t.due_date == date)
            .collect()
    }

    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.engine.load().tasks
    }
}

/// The 3-key task ordering: completed ascending, due date ascending
/// (lexicographic equals chronological for the fixed-width format), creation
/// time descending.
fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.due_date.cmp(&b.due_date))
        .then_with(|| b.created_at.cmp(&a.created_at))
}
