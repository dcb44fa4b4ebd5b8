//! Field rules for category and task payloads.
//!
//! Rules run in a fixed order and the first failure is reported. Nothing
//! here touches storage; the task category check takes the current
//! category collection as an argument.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{
    parse_due_date, Category, CategoryFields, CategoryPayload, Priority, Status, TaskFields,
    TaskPayload,
};

pub const CATEGORY_NAME_MIN: usize = 2;
pub const CATEGORY_NAME_MAX: usize = 20;
pub const TASK_TITLE_MIN: usize = 3;
pub const TASK_TITLE_MAX: usize = 50;
pub const TASK_DESCRIPTION_MAX: usize = 250;

// ASCII word characters, whitespace, and the accented Latin ranges á-ž / Á-Ž.
static CATEGORY_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z_\s\x{E1}-\x{17E}\x{C1}-\x{17D}]+$").expect("category name pattern")
});

static COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color pattern"));

fn reject<T>(reason: impl Into<String>) -> Result<T> {
    Err(Error::Validation(reason.into()))
}

pub fn validate_category_name(name: Option<&str>) -> Result<String> {
    let Some(name) = name else {
        return reject(category_name_message());
    };
    let len = name.chars().count();
    if !(CATEGORY_NAME_MIN..=CATEGORY_NAME_MAX).contains(&len)
        || !CATEGORY_NAME_PATTERN.is_match(name)
    {
        return reject(category_name_message());
    }
    Ok(name.to_string())
}

fn category_name_message() -> String {
    format!(
        "Invalid category name. Allowed characters: letters, digits, spaces. Length {CATEGORY_NAME_MIN}-{CATEGORY_NAME_MAX}."
    )
}

pub fn validate_color(color: Option<&str>) -> Result<String> {
    match color {
        Some(color) if COLOR_PATTERN.is_match(color) => Ok(color.to_string()),
        _ => reject("Invalid color. Use a hex code such as #ff6600."),
    }
}

/// Check a category payload: name first, then color.
pub fn validate_category(payload: &CategoryPayload) -> Result<CategoryFields> {
    let name = validate_category_name(payload.name.as_deref())?;
    let color = validate_color(payload.color.as_deref())?;
    Ok(CategoryFields { name, color })
}

/// Check a task payload against the field rules and the given categories.
pub fn validate_task(payload: &TaskPayload, categories: &[Category]) -> Result<TaskFields> {
    let title = match payload.title.as_deref() {
        Some(title)
            if (TASK_TITLE_MIN..=TASK_TITLE_MAX).contains(&title.trim().chars().count()) =>
        {
            title.to_string()
        }
        _ => {
            return reject(format!(
                "Task title must be {TASK_TITLE_MIN}-{TASK_TITLE_MAX} characters."
            ))
        }
    };

    let description = match payload.description.as_deref() {
        None | Some("") => None,
        Some(text) if text.chars().count() <= TASK_DESCRIPTION_MAX => Some(text.to_string()),
        Some(_) => {
            return reject(format!(
                "Task description is too long (max {TASK_DESCRIPTION_MAX} characters)."
            ))
        }
    };

    let Some(due_date) = payload.due_date.as_deref().and_then(parse_due_date) else {
        return reject("Invalid due date.");
    };

    let Some(priority) = payload
        .priority
        .as_deref()
        .and_then(|raw| raw.parse::<Priority>().ok())
    else {
        return reject("Invalid priority. Allowed: Low, Medium, High.");
    };

    let Some(status) = payload
        .status
        .as_deref()
        .and_then(|raw| raw.parse::<Status>().ok())
    else {
        return reject("Invalid status. Allowed: Active, Done.");
    };

    let category_id = match payload.category_id.as_deref() {
        Some(id) if categories.iter().any(|category| category.id == id) => id.to_string(),
        _ => return reject("Category does not exist."),
    };

    Ok(TaskFields {
        title,
        description,
        due_date,
        priority,
        status,
        category_id,
    })
}
