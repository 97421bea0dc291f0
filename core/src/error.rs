//! Error types for the todo API client.
//!
//! # Design
//! The server answers every failure with `{"errorMessage": ...}`. Statuses
//! the API documents get their own variant carrying that message; anything
//! else lands in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400: the payload failed validation.
    #[error("rejected: {0}")]
    Validation(String),

    /// 404: the todo does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// 409: the todo changed while the update was being applied.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
