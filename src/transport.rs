//! Request/reply surface over a [`TaskDesk`].
//!
//! Each request maps to one store operation; replies carry a status code
//! and an optional JSON body:
//!
//! | Request          | Success      | Failure         |
//! |------------------|--------------|-----------------|
//! | ListCategories   | 200 + array  |                 |
//! | CreateCategory   | 201 + record | 400             |
//! | UpdateCategory   | 200 + record | 400 / 404       |
//! | DeleteCategory   | 204          | 400 / 404       |
//! | ListTasks        | 200 + array  | 400 bad filter  |
//! | CreateTask       | 201 + record | 400             |
//! | UpdateTask       | 200 + record | 400 / 404       |
//! | DeleteTask       | 204          | 404             |
//!
//! Storage failures reply 500.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::desk::TaskDesk;
use crate::error::{Error, Result};
use crate::model::{CategoryPayload, TaskPayload};
use crate::query::TaskFilter;
use crate::storage::Backend;

#[derive(Debug, Clone)]
pub enum Request {
    ListCategories,
    GetCategory { id: String },
    CreateCategory { payload: CategoryPayload },
    UpdateCategory { id: String, payload: CategoryPayload },
    DeleteCategory { id: String },
    ListTasks { filter: TaskFilter, today: NaiveDate },
    GetTask { id: String },
    CreateTask { payload: TaskPayload },
    UpdateTask { id: String, payload: TaskPayload },
    DeleteTask { id: String },
}

impl Request {
    /// Short operation name used in logs and output envelopes
    pub fn operation(&self) -> &'static str {
        match self {
            Request::ListCategories => "category ls",
            Request::GetCategory { .. } => "category show",
            Request::CreateCategory { .. } => "category new",
            Request::UpdateCategory { .. } => "category edit",
            Request::DeleteCategory { .. } => "category rm",
            Request::ListTasks { .. } => "task ls",
            Request::GetTask { .. } => "task show",
            Request::CreateTask { .. } => "task new",
            Request::UpdateTask { .. } => "task edit",
            Request::DeleteTask { .. } => "task rm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Reply {
    fn ok<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            status: 200,
            body: Some(serde_json::to_value(value)?),
        })
    }

    fn created<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            status: 201,
            body: Some(serde_json::to_value(value)?),
        })
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// Reply describing a failed request
    pub fn from_error(err: &Error) -> Self {
        Self {
            status: err.http_status(),
            body: Some(serde_json::json!({ "error": err.to_string() })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Run a request, returning the store error on failure.
pub fn handle<B: Backend>(desk: &TaskDesk<B>, request: Request) -> Result<Reply> {
    tracing::debug!(operation = request.operation(), "handling request");
    match request {
        Request::ListCategories => Reply::ok(&desk.categories().list()),
        Request::GetCategory { id } => Reply::ok(&desk.categories().get(&id)?),
        Request::CreateCategory { payload } => {
            Reply::created(&desk.categories().create(&payload)?)
        }
        Request::UpdateCategory { id, payload } => {
            Reply::ok(&desk.categories().update(&id, &payload)?)
        }
        Request::DeleteCategory { id } => {
            desk.categories().delete(&id)?;
            Ok(Reply::no_content())
        }
        Request::ListTasks { filter, today } => Reply::ok(&desk.query(&filter, today)),
        Request::GetTask { id } => Reply::ok(&desk.tasks().get(&id)?),
        Request::CreateTask { payload } => Reply::created(&desk.tasks().create(&payload)?),
        Request::UpdateTask { id, payload } => Reply::ok(&desk.tasks().update(&id, &payload)?),
        Request::DeleteTask { id } => {
            desk.tasks().delete(&id)?;
            Ok(Reply::no_content())
        }
    }
}

/// Run a request, folding failures into an error reply.
pub fn respond<B: Backend>(desk: &TaskDesk<B>, request: Request) -> Reply {
    let operation = request.operation();
    handle(desk, request).unwrap_or_else(|err| {
        tracing::debug!(operation, error = %err, "request failed");
        Reply::from_error(&err)
    })
}
