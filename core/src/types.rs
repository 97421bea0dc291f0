//! Wire types for the todo API.
//!
//! # Design
//! Defined independently of the server crate so the client core carries no
//! framework dependencies. The live-server integration test catches schema
//! drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub value: String,
    pub order: u64,
    pub done_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a todo. The server assigns `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub value: String,
}

/// Request payload for updating a todo. Only the fields that are `Some` are
/// sent. `done: Some(None)` is sent as `null`, which clears completion just
/// like `Some(Some(false))`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<Option<bool>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Greeting {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodoEnvelope {
    pub todo: Todo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodoList {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub error_message: String,
}
