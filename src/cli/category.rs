//! taskdesk category command implementations.

use std::path::PathBuf;

use serde_json::Value;

use crate::cli::CategoryCommands;
use crate::error::{Error, Result};
use crate::model::{Category, CategoryPayload};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::transport::{self, Request};

pub fn run(cmd: CategoryCommands, data_dir: Option<PathBuf>, options: OutputOptions) -> Result<()> {
    let desk = super::open_desk(data_dir)?;

    let request = match cmd {
        CategoryCommands::Ls => Request::ListCategories,
        CategoryCommands::Show { id } => Request::GetCategory { id },
        CategoryCommands::New { name, color } => Request::CreateCategory {
            payload: CategoryPayload::new(name, color),
        },
        CategoryCommands::Edit { id, name, color } => {
            if name.is_none() && color.is_none() {
                return Err(Error::InvalidArgument(
                    "nothing to change (pass --name and/or --color)".to_string(),
                ));
            }
            let current = desk.categories().get(&id)?;
            Request::UpdateCategory {
                id,
                payload: CategoryPayload::new(
                    name.unwrap_or(current.name),
                    color.unwrap_or(current.color),
                ),
            }
        }
        CategoryCommands::Rm { id } => {
            let report = desk.categories().delete(&id)?;
            let removed = report.removed_task_ids.len();

            let mut human = HumanOutput::new(format!("Category {id} deleted"));
            human.push_summary("tasks removed", removed.to_string());
            let data = serde_json::json!({
                "id": id,
                "removed_tasks": removed,
                "removed_task_ids": report.removed_task_ids,
            });
            return emit_success(options, "category rm", 204, &data, Some(&human));
        }
    };

    let operation = request.operation();
    let reply = transport::handle(&desk, request)?;
    let body = reply.body.unwrap_or(Value::Null);
    let human = render(operation, &body);
    emit_success(options, operation, reply.status, &body, Some(&human))
}

fn render(operation: &str, body: &Value) -> HumanOutput {
    if let Ok(categories) = serde_json::from_value::<Vec<Category>>(body.clone()) {
        let mut human = HumanOutput::new(format!("{} categories", categories.len()));
        for category in categories {
            human.push_detail(format_category(&category));
        }
        return human;
    }

    match serde_json::from_value::<Category>(body.clone()) {
        Ok(category) => {
            let header = match operation {
                "category new" => "Category created",
                "category edit" => "Category updated",
                _ => "Category",
            };
            let mut human = HumanOutput::new(header);
            human.push_summary("id", category.id);
            human.push_summary("name", category.name);
            human.push_summary("color", category.color);
            human
        }
        Err(_) => HumanOutput::new(operation.to_string()),
    }
}

fn format_category(category: &Category) -> String {
    let marker = if category.is_default() { " (default)" } else { "" };
    format!("{} {} {}{marker}", category.color, category.name, category.id)
}
