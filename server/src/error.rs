//! Single place where handler failures become HTTP responses.
//!
//! Every failure is logged before it is mapped. Clients get
//! `{"errorMessage": ...}`; store failures other than conflicts are reported
//! with a fixed message and their details stay in the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "todo does not exist";
pub const CONFLICT_MESSAGE: &str = "todo was modified concurrently";
pub const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("todo does not exist")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error body sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            AppError::Store(StoreError::Conflict(_)) => CONFLICT_MESSAGE.to_string(),
            AppError::Store(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            error_message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn validation_keeps_its_message() {
        let error = AppError::Validation("value is required".to_string());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.client_message(), "value is required");
    }

    #[test]
    fn not_found_uses_fixed_message() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound.client_message(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn conflict_maps_to_409() {
        let error = AppError::from(StoreError::Conflict(Uuid::nil()));
        assert_eq!(error.status(), StatusCode::CONFLICT);
        assert_eq!(error.client_message(), CONFLICT_MESSAGE);
    }

    #[test]
    fn io_failure_does_not_leak_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/todos.json");
        let error = AppError::from(StoreError::from(io));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.client_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn error_body_uses_camel_case() {
        let body = ErrorBody {
            error_message: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "errorMessage": "boom" })
        );
    }
}
