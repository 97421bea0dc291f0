use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{Greeting, NewTodo, TodoEnvelope, TodoList};
use crate::ordering;
use crate::store::{Guarded, MemoryStore, TodoStore};
use crate::validate;

/// Shared handler state: the store every request reads and writes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

/// Request body parsed as loose JSON, left for [`validate`] to shape.
///
/// An empty body reads as `{}`. Anything unparsable is a validation failure
/// rather than the framework's own rejection, so it gets the usual error body.
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Map::new())));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("malformed JSON body: {error}")))
    }
}

/// Ids that are not UUIDs cannot name a stored todo.
fn parse_id(todo_id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(todo_id).map_err(|_| AppError::NotFound)
}

pub async fn greet() -> Json<Greeting> {
    Json(Greeting {
        message: "Hi!".to_string(),
    })
}

pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<TodoEnvelope>), AppError> {
    let input = validate::create_payload(body)?;

    let max = state.store.find_max_order().await?;
    let order = ordering::next_order(max.as_ref());
    let todo = state
        .store
        .insert(NewTodo {
            value: input.value,
            order,
        })
        .await?;

    tracing::info!(id = %todo.id, order, "todo created");
    Ok((StatusCode::CREATED, Json(TodoEnvelope { todo })))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<TodoList>, AppError> {
    let todos = state.store.list().await?;
    Ok(Json(TodoList { todos }))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&todo_id)?;
    let input = validate::update_payload(body)?;

    let mut current = state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    let previous_order = current.order;
    let mut writes = Vec::with_capacity(2);

    if let Some(order) = input.order {
        let holder = state.store.find_by_order(order).await?;
        if let Some(partner) = ordering::reposition(&mut current, order, holder) {
            tracing::debug!(%id, partner = %partner.id, from = previous_order, to = order, "swapping orders");
            writes.push(Guarded::new(partner, order));
        }
    }

    if let Some(done) = input.done {
        current.done_at = done.unwrap_or(false).then(Utc::now);
    }

    if let Some(value) = input.value {
        current.value = value;
    }

    writes.push(Guarded::new(current, previous_order));
    state.store.commit(writes).await?;

    tracing::info!(%id, "todo updated");
    Ok(Json(json!({})))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&todo_id)?;
    state.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    // Lost a race with another delete: report it the same way.
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(%id, "todo deleted");
    Ok(Json(json!({})))
}
