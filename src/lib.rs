//! taskdesk - Personal Task Manager Library
//!
//! This library provides the core functionality for the taskdesk CLI:
//! validated storage of tasks and categories with referential integrity
//! between them.
//!
//! # Core Concepts
//!
//! - **Categories**: Named, colored buckets; `default` always exists
//! - **Tasks**: Titled items with due date, priority, status, and category
//! - **Cascade**: Deleting a category deletes the tasks filed under it
//! - **Filters**: Category, status, priority, and due-date bucket views
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.taskdesk.toml`
//! - `error`: Error types and result aliases
//! - `model`: Category and task records
//! - `validate`: Field rules for payloads
//! - `category`: Category store and default-category bootstrap
//! - `task`: Task store
//! - `cascade`: Category deletion with dependent task removal
//! - `query`: Task filtering
//! - `present`: Display attributes for priorities and statuses
//! - `storage`: Collection backends (JSON files, in-memory)
//! - `lock`: File locking and atomic writes
//! - `desk`: Stores wired over one backend
//! - `transport`: Request/reply mapping with status codes
//! - `output`: Human and JSON output for CLI commands

pub mod cascade;
pub mod category;
pub mod cli;
pub mod config;
pub mod desk;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod present;
pub mod query;
pub mod storage;
pub mod task;
pub mod transport;
pub mod validate;

pub use error::{Error, Result};
