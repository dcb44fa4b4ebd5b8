//! Wiring of the category and task stores over one backend.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::category::CategoryStore;
use crate::config::Config;
use crate::error::Result;
use crate::model::Task;
use crate::query::{self, TaskFilter};
use crate::storage::{Backend, JsonFileBackend};
use crate::task::TaskStore;

pub struct TaskDesk<B: Backend> {
    categories: CategoryStore<B>,
    tasks: TaskStore<B>,
}

impl TaskDesk<JsonFileBackend> {
    /// Open the JSON-file store described by `config`, relative to `base`.
    pub fn open_dir(config: &Config, base: &Path) -> Result<Self> {
        let backend = JsonFileBackend::new(config.resolve_data_dir(base))
            .with_lock_timeout(config.storage.lock_timeout_ms)
            .with_pretty(config.storage.pretty);
        backend.init()?;
        Self::open(Arc::new(backend), config)
    }
}

impl<B: Backend> TaskDesk<B> {
    /// Initialize both stores; the default category exists afterwards.
    pub fn open(backend: Arc<B>, config: &Config) -> Result<Self> {
        let categories = CategoryStore::open(backend, &config.default_category)?;
        let tasks = TaskStore::new(categories.clone());
        Ok(Self { categories, tasks })
    }

    pub fn categories(&self) -> &CategoryStore<B> {
        &self.categories
    }

    pub fn tasks(&self) -> &TaskStore<B> {
        &self.tasks
    }

    /// Due-date ordered tasks narrowed by `filter` as of `today`.
    pub fn query(&self, filter: &TaskFilter, today: NaiveDate) -> Vec<Task> {
        let tasks = self.tasks.list();
        if filter.is_unconstrained() {
            return tasks;
        }
        query::filter_tasks(&tasks, filter, today)
    }
}
