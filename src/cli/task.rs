//! taskdesk task command implementations.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::cli::TaskCommands;
use crate::desk::TaskDesk;
use crate::error::{Error, Result};
use crate::model::{parse_due_date, CategoryIndex, Status, Task, TaskPayload};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::present;
use crate::query::TaskFilter;
use crate::storage::JsonFileBackend;
use crate::transport::{self, Request};

pub fn run(cmd: TaskCommands, data_dir: Option<PathBuf>, options: OutputOptions) -> Result<()> {
    let desk = super::open_desk(data_dir)?;
    let marks_done = matches!(cmd, TaskCommands::Done { .. });

    let request = match cmd {
        TaskCommands::Ls {
            category,
            status,
            priority,
            due,
            on,
        } => {
            let filter = TaskFilter::from_params(
                category.as_deref(),
                status.as_deref(),
                priority.as_deref(),
                due.as_deref(),
            )?;
            Request::ListTasks {
                filter,
                today: evaluation_date(on.as_deref())?,
            }
        }
        TaskCommands::Show { id } => Request::GetTask { id },
        TaskCommands::New {
            title,
            due,
            priority,
            status,
            category,
            description,
        } => {
            let category_id = match category {
                Some(id) => id,
                None => first_category_id(&desk)?,
            };
            Request::CreateTask {
                payload: TaskPayload {
                    title: Some(title),
                    description,
                    due_date: Some(due),
                    priority: Some(priority),
                    status: Some(status),
                    category_id: Some(category_id),
                },
            }
        }
        TaskCommands::Edit {
            id,
            title,
            due,
            priority,
            status,
            category,
            description,
        } => {
            let current = desk.tasks().get(&id)?;
            let payload = TaskPayload {
                title: Some(title.unwrap_or(current.title)),
                description: description.or(current.description),
                due_date: Some(due.unwrap_or_else(|| current.due_date.to_string())),
                priority: Some(priority.unwrap_or_else(|| current.priority.to_string())),
                status: Some(status.unwrap_or_else(|| current.status.to_string())),
                category_id: Some(category.unwrap_or(current.category_id)),
            };
            Request::UpdateTask { id, payload }
        }
        TaskCommands::Done { id } => {
            let current = desk.tasks().get(&id)?;
            Request::UpdateTask {
                id,
                payload: payload_from(&current, Status::Done),
            }
        }
        TaskCommands::Rm { id } => Request::DeleteTask { id },
    };

    let operation = if marks_done {
        "task done"
    } else {
        request.operation()
    };
    let reply = transport::handle(&desk, request)?;
    let body = reply.body.unwrap_or(Value::Null);
    let human = render(operation, &body, &desk.categories().index());
    emit_success(options, operation, reply.status, &body, Some(&human))
}

fn evaluation_date(on: Option<&str>) -> Result<NaiveDate> {
    match on {
        Some(raw) => parse_due_date(raw)
            .ok_or_else(|| Error::InvalidArgument(format!("invalid date '{raw}'"))),
        None => Ok(Local::now().date_naive()),
    }
}

fn first_category_id(desk: &TaskDesk<JsonFileBackend>) -> Result<String> {
    desk.categories()
        .list()
        .into_iter()
        .next()
        .map(|category| category.id)
        .ok_or_else(|| Error::InvalidArgument("no categories available".to_string()))
}

fn payload_from(task: &Task, status: Status) -> TaskPayload {
    TaskPayload {
        title: Some(task.title.clone()),
        description: task.description.clone(),
        due_date: Some(task.due_date.to_string()),
        priority: Some(task.priority.to_string()),
        status: Some(status.to_string()),
        category_id: Some(task.category_id.clone()),
    }
}

fn render(operation: &str, body: &Value, index: &CategoryIndex) -> HumanOutput {
    if let Ok(tasks) = serde_json::from_value::<Vec<Task>>(body.clone()) {
        let mut human = HumanOutput::new(format!("{} tasks", tasks.len()));
        for task in &tasks {
            human.push_detail(present::task_line(task, index));
            if present::category_label(task, index).is_none() {
                human.push_warning(format!(
                    "task {} refers to unknown category {}",
                    task.id, task.category_id
                ));
            }
        }
        return human;
    }

    let Ok(task) = serde_json::from_value::<Task>(body.clone()) else {
        return HumanOutput::new(match operation {
            "task rm" => "Task deleted".to_string(),
            other => other.to_string(),
        });
    };

    let header = match operation {
        "task new" => "Task created",
        "task edit" => "Task updated",
        "task done" => "Task completed",
        _ => "Task",
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("id", task.id.clone());
    human.push_summary("title", task.title.clone());
    human.push_summary("due", task.due_date.to_string());
    human.push_summary(
        "priority",
        format!("{} {}", task.priority, present::priority_color(task.priority)),
    );
    human.push_summary(
        "status",
        format!("{} [{}]", task.status, present::status_badge(task.status)),
    );
    let category = present::category_label(&task, index)
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| task.category_id.clone());
    human.push_summary("category", category);
    if let Some(description) = &task.description {
        human.push_detail(description.clone());
    }
    human
}
