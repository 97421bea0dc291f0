//! Todo document and the JSON envelopes the API speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single todo document as stored and as returned to clients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub value: String,
    /// List rank; higher sorts first.
    pub order: u64,
    /// Completion time, `None` while pending.
    pub done_at: Option<DateTime<Utc>>,
}

/// Fields of a todo before the store has assigned it an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub value: String,
    pub order: u64,
}

/// Validated creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub value: String,
}

/// Validated update payload. Every field distinguishes "absent" from
/// "provided", so `done: null` clears completion while an omitted `done`
/// leaves it alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub value: Option<String>,
    pub order: Option<u64>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Option<bool>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Greeting {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}
