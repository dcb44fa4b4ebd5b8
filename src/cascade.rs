//! Category deletion with removal of dependent tasks.
//!
//! The two collections are rewritten as one logical unit: both regions are
//! held (categories, then tasks), the task collection is written first and
//! the category collection second. If the category write fails the previous
//! task collection is put back, so tasks never outlive their category.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::model::{Category, Task, DEFAULT_CATEGORY_ID};
use crate::storage::{Backend, Collection};

/// Outcome of a cascading category delete
#[derive(Debug, Clone, Serialize)]
pub struct CascadeReport {
    pub category: Category,
    pub removed_task_ids: Vec<String>,
}

/// Split `tasks` into the ones kept and the ones filed under `category_id`.
///
/// Relative order of the kept tasks is unchanged.
pub fn remove_dependents(tasks: Vec<Task>, category_id: &str) -> (Vec<Task>, Vec<Task>) {
    tasks
        .into_iter()
        .partition(|task| task.category_id != category_id)
}

pub fn delete_category_cascade<B: Backend>(backend: &B, category_id: &str) -> Result<CascadeReport> {
    if category_id == DEFAULT_CATEGORY_ID {
        return Err(Error::DefaultCategoryProtected);
    }

    let _categories_guard = backend.lock(Collection::Categories)?;
    let categories: Vec<Category> = backend.read_for_update(Collection::Categories)?;
    let Some(position) = categories.iter().position(|c| c.id == category_id) else {
        return Err(Error::CategoryNotFound(category_id.to_string()));
    };

    let _tasks_guard = backend.lock(Collection::Tasks)?;
    let original_tasks: Vec<Task> = backend.read_for_update(Collection::Tasks)?;
    let (kept, removed) = remove_dependents(original_tasks.clone(), category_id);

    if !removed.is_empty() {
        backend.write_all(Collection::Tasks, &kept)?;
    }

    let mut remaining = categories;
    let category = remaining.remove(position);
    if let Err(err) = backend.write_all(Collection::Categories, &remaining) {
        warn!(category = %category_id, error = %err, "category write failed, restoring tasks");
        if !removed.is_empty() {
            if let Err(restore_err) = backend.write_all(Collection::Tasks, &original_tasks) {
                error!(category = %category_id, error = %restore_err, "failed to restore tasks");
            }
        }
        return Err(err);
    }

    let removed_task_ids: Vec<String> = removed.into_iter().map(|task| task.id).collect();
    info!(
        category = %category_id,
        removed_tasks = removed_task_ids.len(),
        "category deleted"
    );
    Ok(CascadeReport {
        category,
        removed_task_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};
    use crate::storage::MemoryBackend;
    use chrono::NaiveDate;

    fn task(id: &str, category_id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: None,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            priority: Priority::Low,
            status: Status::Active,
            category_id: category_id.to_string(),
        }
    }

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: format!("Cat {id}"),
            color: "#000000".to_string(),
        }
    }

    fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend
            .write_all(
                Collection::Categories,
                &[category(DEFAULT_CATEGORY_ID), category("a"), category("b")],
            )
            .unwrap();
        backend
            .write_all(
                Collection::Tasks,
                &[task("t1", "a"), task("t2", "b"), task("t3", "a")],
            )
            .unwrap();
        backend
    }

    #[test]
    fn remove_dependents_keeps_order() {
        let tasks = vec![task("1", "a"), task("2", "b"), task("3", "a"), task("4", "c")];
        let (kept, removed) = remove_dependents(tasks, "a");
        let kept: Vec<&str> = kept.iter().map(|t| t.id.as_str()).collect();
        let removed: Vec<&str> = removed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(kept, vec!["2", "4"]);
        assert_eq!(removed, vec!["1", "3"]);
    }

    #[test]
    fn removes_exactly_dependent_tasks() {
        let backend = seeded();
        let report = delete_category_cascade(&backend, "a").expect("delete");
        assert_eq!(report.category.id, "a");
        assert_eq!(report.removed_task_ids, vec!["t1".to_string(), "t3".to_string()]);

        let tasks: Vec<Task> = backend.read_all(Collection::Tasks);
        assert_eq!(tasks, vec![task("t2", "b")]);
        let categories: Vec<Category> = backend.read_all(Collection::Categories);
        assert!(categories.iter().all(|c| c.id != "a"));
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn default_is_forbidden() {
        let backend = seeded();
        let err = delete_category_cascade(&backend, DEFAULT_CATEGORY_ID).expect_err("forbidden");
        assert!(matches!(err, Error::DefaultCategoryProtected));
    }

    #[test]
    fn unknown_category_is_not_found() {
        let backend = seeded();
        let err = delete_category_cascade(&backend, "zzz").expect_err("missing");
        assert!(matches!(err, Error::CategoryNotFound(_)));
    }

    #[test]
    fn failed_task_write_leaves_both_collections() {
        let backend = seeded();
        backend.fail_writes(Collection::Tasks, true);
        assert!(delete_category_cascade(&backend, "a").is_err());

        let categories: Vec<Category> = backend.read_all(Collection::Categories);
        assert!(categories.iter().any(|c| c.id == "a"));
        let tasks: Vec<Task> = backend.read_all(Collection::Tasks);
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn failed_category_write_restores_tasks() {
        let backend = seeded();
        backend.fail_writes(Collection::Categories, true);
        assert!(delete_category_cascade(&backend, "a").is_err());

        let tasks: Vec<Task> = backend.read_all(Collection::Tasks);
        assert_eq!(tasks.len(), 3);
        let categories: Vec<Category> = backend.read_all(Collection::Categories);
        assert_eq!(categories.len(), 3);
    }
}
