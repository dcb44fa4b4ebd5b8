//! Error types for taskdesk
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (rejected payload, unknown id, bad args)
//! - 3: Blocked by policy (deleting the default category)
//! - 4: Operation failed (storage, locking, serialization)
//!
//! Transport statuses follow the request/reply table: 400 for rejected
//! payloads and policy blocks, 404 for unknown ids, 500 for storage failures.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskdesk CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskdesk operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{0}")]
    Validation(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Policy blocks (exit code 3)
    #[error("The default category cannot be deleted")]
    DefaultCategoryProtected,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_)
            | Error::CategoryNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::DefaultCategoryProtected => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::StorageFailure(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Status reported by the transport for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::DefaultCategoryProtected => 400,
            Error::CategoryNotFound(_) | Error::TaskNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Short machine-readable classification
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::CategoryNotFound(_) | Error::TaskNotFound(_) => "not_found",
            Error::DefaultCategoryProtected => "forbidden",
            Error::InvalidConfig(_) | Error::InvalidArgument(_) => "user_error",
            _ => "storage_failure",
        }
    }

    /// Structured details for JSON output, when the variant carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::CategoryNotFound(id) => Some(serde_json::json!({ "category_id": id })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "task_id": id })),
            Error::Validation(reason) => Some(serde_json::json!({ "reason": reason })),
            Error::LockFailed(path) => {
                Some(serde_json::json!({ "lock": path.to_string_lossy() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for taskdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            status: err.http_status(),
            details: err.details(),
        }
    }
}
