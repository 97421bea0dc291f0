//! Request payload validation.
//!
//! Bodies are checked against a JSON Schema before they are turned into typed
//! input, so every rejection carries the schema's own description of what
//! was wrong. Creation and update share the same path.

use std::sync::LazyLock;

use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::model::{CreateTodo, UpdateTodo};

pub const VALUE_MAX_CHARS: u64 = 50;

/// Largest order a JSON client can send without losing precision.
pub const ORDER_MAX: u64 = 9_007_199_254_740_991;

pub const MISSING_VALUE: &str = "todo value (value) is missing";

static CREATE_SCHEMA: LazyLock<Validator> = LazyLock::new(|| {
    compile(json!({
        "type": "object",
        "required": ["value"],
        "properties": {
            "value": { "type": "string", "minLength": 1, "maxLength": VALUE_MAX_CHARS }
        },
        "additionalProperties": false
    }))
});

static UPDATE_SCHEMA: LazyLock<Validator> = LazyLock::new(|| {
    compile(json!({
        "type": "object",
        "properties": {
            "value": { "type": "string", "minLength": 1, "maxLength": VALUE_MAX_CHARS },
            "order": { "type": "integer", "minimum": 1, "maximum": ORDER_MAX },
            "done": { "type": ["boolean", "null"] }
        }
    }))
});

fn compile(schema: Value) -> Validator {
    jsonschema::validator_for(&schema).expect("built-in request schema compiles")
}

fn check<T: DeserializeOwned>(schema: &Validator, body: Value) -> Result<T, AppError> {
    if let Some(error) = schema.iter_errors(&body).next() {
        return Err(AppError::Validation(error.to_string()));
    }
    serde_json::from_value(body).map_err(|error| AppError::Validation(error.to_string()))
}

fn normalize_value(value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(MISSING_VALUE.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn create_payload(body: Value) -> Result<CreateTodo, AppError> {
    let input: CreateTodo = check(&CREATE_SCHEMA, body)?;
    Ok(CreateTodo {
        value: normalize_value(input.value)?,
    })
}

pub fn update_payload(body: Value) -> Result<UpdateTodo, AppError> {
    let input: UpdateTodo = check(&UPDATE_SCHEMA, body)?;
    Ok(UpdateTodo {
        value: input.value.map(normalize_value).transpose()?,
        ..input
    })
}
