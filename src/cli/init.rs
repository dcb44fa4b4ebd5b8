//! taskdesk init command implementation
//!
//! Creates the config file, the data directory, and the default category.

use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::model::DEFAULT_CATEGORY_ID;
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct InitReport {
    data_dir: PathBuf,
    created: InitCreated,
    categories: usize,
    tasks: usize,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    data_dir: bool,
}

pub fn run(data_dir: Option<PathBuf>, options: OutputOptions) -> Result<()> {
    let base = std::env::current_dir()?;
    let created_config = ensure_config(&base)?;

    let mut config = Config::load_from_dir(&base);
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    let resolved = config.resolve_data_dir(&base);
    let created_data_dir = !resolved.exists();

    let desk = super::open_desk(Some(resolved.clone()))?;
    let categories = desk.categories().list();
    let tasks = desk.tasks().list();

    let report = InitReport {
        data_dir: resolved.clone(),
        created: InitCreated {
            config: created_config,
            data_dir: created_data_dir,
        },
        categories: categories.len(),
        tasks: tasks.len(),
    };

    let mut human = HumanOutput::new(format!("taskdesk initialized in {}", resolved.display()));
    if created_config {
        human.push_summary("created", CONFIG_FILE);
    }
    if created_data_dir {
        human.push_summary("created", format!("{}/", resolved.display()));
    }
    human.push_summary("categories", categories.len().to_string());
    human.push_summary("tasks", tasks.len().to_string());
    if let Some(default) = categories.iter().find(|c| c.id == DEFAULT_CATEGORY_ID) {
        human.push_detail(format!("default category: {} ({})", default.name, default.color));
    }

    emit_success(options, "init", 200, &report, Some(&human))
}

fn ensure_config(base: &Path) -> Result<bool> {
    let path = base.join(CONFIG_FILE);
    if path.exists() {
        return Ok(false);
    }
    Config::default().save(&path)?;
    Ok(true)
}
