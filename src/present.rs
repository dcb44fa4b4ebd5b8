//! Display attributes derived from task enums and the category lookup.

use crate::model::{CategoryIndex, Priority, Status, Task};

/// Accent color for a priority level
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#dc3545",
        Priority::Medium => "#fd7e14",
        Priority::Low => "#198754",
    }
}

/// Badge class for a status
pub fn status_badge(status: Status) -> &'static str {
    match status {
        Status::Active => "badge bg-success",
        Status::Done => "badge bg-secondary",
    }
}

/// Finished tasks are rendered struck through
pub fn is_struck_through(status: Status) -> bool {
    status == Status::Done
}

/// Category name and color for a task, if its category is still known
pub fn category_label<'a>(task: &Task, index: &'a CategoryIndex) -> Option<(&'a str, &'a str)> {
    index
        .get(&task.category_id)
        .map(|category| (category.name.as_str(), category.color.as_str()))
}

/// One-line summary used by the human-readable task listing
pub fn task_line(task: &Task, index: &CategoryIndex) -> String {
    let category = category_label(task, index)
        .map(|(name, _)| name)
        .unwrap_or("?");
    let mark = if is_struck_through(task.status) { "x" } else { " " };
    format!(
        "[{mark}] {} {:<6} {} ({category}) {}",
        task.due_date.format("%Y-%m-%d"),
        task.priority.as_str(),
        task.title,
        task.id
    )
}
