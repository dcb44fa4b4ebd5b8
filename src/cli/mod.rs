//! Command-line interface for taskdesk
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::desk::TaskDesk;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::JsonFileBackend;

mod category;
mod init;
mod task;

/// taskdesk - personal task manager
///
/// Keeps tasks and categories in a data directory, validating every change
/// and removing a category's tasks when the category is deleted.
#[derive(Parser, Debug)]
#[command(name = "taskdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding categories.json and tasks.json
    #[arg(long, global = true, env = "TASKDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and the default category
    Init,

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    Ls,

    /// Show one category
    Show {
        /// Category ID
        id: String,
    },

    /// Create a category
    New {
        /// Category name (2-20 letters, digits, spaces)
        name: String,

        /// Color as a hex code, e.g. #ff6600
        #[arg(long)]
        color: String,
    },

    /// Rename or recolor a category
    Edit {
        /// Category ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category and all of its tasks
    Rm {
        /// Category ID
        id: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks by due date
    Ls {
        /// Only tasks in this category ("all" for any)
        #[arg(long)]
        category: Option<String>,

        /// Only tasks with this status: Active, Done, all
        #[arg(long)]
        status: Option<String>,

        /// Only tasks with this priority: Low, Medium, High, all
        #[arg(long)]
        priority: Option<String>,

        /// Due-date window: all, today, week, month
        #[arg(long)]
        due: Option<String>,

        /// Evaluate the due-date window as of this date (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,
    },

    /// Show one task
    Show {
        /// Task ID
        id: String,
    },

    /// Create a task
    New {
        /// Task title (3-50 characters)
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Priority: Low, Medium, High
        #[arg(long, default_value = "Medium")]
        priority: String,

        /// Status: Active, Done
        #[arg(long, default_value = "Active")]
        status: String,

        /// Category ID (defaults to the first category)
        #[arg(long)]
        category: Option<String>,

        /// Optional description (max 250 characters)
        #[arg(long)]
        description: Option<String>,
    },

    /// Change a task; unspecified fields keep their current values
    Edit {
        /// Task ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// New description; pass an empty string to clear it
        #[arg(long)]
        description: Option<String>,
    },

    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Init => init::run(self.data_dir, options),
            Commands::Category(cmd) => category::run(cmd, self.data_dir, options),
            Commands::Task(cmd) => task::run(cmd, self.data_dir, options),
        }
    }
}

/// Resolve configuration from the working directory and open the stores.
pub(crate) fn open_desk(data_dir: Option<PathBuf>) -> Result<TaskDesk<JsonFileBackend>> {
    let base = std::env::current_dir()?;
    let mut config = Config::load_from_dir(&base);
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    TaskDesk::open_dir(&config, &base)
}
