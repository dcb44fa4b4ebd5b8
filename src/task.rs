//! Task management for taskdesk.
//!
//! Tasks are stored in the `tasks` collection. Every write checks the
//! task's category against the category collection as it is at that moment.

use std::sync::Arc;

use tracing::info;

use crate::category::{fresh_id, CategoryStore};
use crate::error::{Error, Result};
use crate::model::{Category, Task, TaskPayload};
use crate::storage::{Backend, Collection};
use crate::validate;

/// Stable sort by due date; equal dates keep their stored order.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.due_date);
}

pub struct TaskStore<B: Backend> {
    backend: Arc<B>,
    categories: CategoryStore<B>,
}

impl<B: Backend> Clone for TaskStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            categories: self.categories.clone(),
        }
    }
}

impl<B: Backend> TaskStore<B> {
    pub fn new(categories: CategoryStore<B>) -> Self {
        Self {
            backend: Arc::clone(categories.backend()),
            categories,
        }
    }

    pub fn categories(&self) -> &CategoryStore<B> {
        &self.categories
    }

    fn read(&self) -> Vec<Task> {
        self.backend.read_all(Collection::Tasks)
    }

    fn read_for_update(&self) -> Result<Vec<Task>> {
        self.backend.read_for_update(Collection::Tasks)
    }

    /// All tasks ordered by due date, earliest first
    pub fn list(&self) -> Vec<Task> {
        let mut tasks = self.read();
        sort_by_due_date(&mut tasks);
        tasks
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        self.read()
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    pub fn create(&self, payload: &TaskPayload) -> Result<Task> {
        // Held so the category cannot vanish between the check and the write.
        let _categories_guard = self.backend.lock(Collection::Categories)?;
        let categories: Vec<Category> = self.backend.read_all(Collection::Categories);
        let fields = validate::validate_task(payload, &categories)?;

        let _tasks_guard = self.backend.lock(Collection::Tasks)?;
        let mut tasks = self.read_for_update()?;
        let task = fields.into_task(fresh_id(|candidate| {
            tasks.iter().any(|task| task.id == candidate)
        }));
        tasks.push(task.clone());
        self.backend.write_all(Collection::Tasks, &tasks)?;

        info!(id = %task.id, category = %task.category_id, "task created");
        Ok(task)
    }

    /// Replace every mutable field of an existing task; the id is kept.
    pub fn update(&self, id: &str, payload: &TaskPayload) -> Result<Task> {
        let _categories_guard = self.backend.lock(Collection::Categories)?;
        let categories: Vec<Category> = self.backend.read_all(Collection::Categories);
        let fields = validate::validate_task(payload, &categories)?;

        let _tasks_guard = self.backend.lock(Collection::Tasks)?;
        let mut tasks = self.read_for_update()?;
        let Some(existing) = tasks.iter_mut().find(|task| task.id == id) else {
            return Err(Error::TaskNotFound(id.to_string()));
        };
        *existing = fields.into_task(id.to_string());
        let updated = existing.clone();
        self.backend.write_all(Collection::Tasks, &tasks)?;

        info!(id = %updated.id, "task updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<Task> {
        let _guard = self.backend.lock(Collection::Tasks)?;
        let mut tasks = self.read_for_update()?;
        let Some(position) = tasks.iter().position(|task| task.id == id) else {
            return Err(Error::TaskNotFound(id.to_string()));
        };
        let removed = tasks.remove(position);
        self.backend.write_all(Collection::Tasks, &tasks)?;

        info!(id = %removed.id, "task deleted");
        Ok(removed)
    }
}
