//! Typed errors and their HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ErrorBody, ErrorDetail, FieldError};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
    #[error("{0}")]
    Conflict(String),
    #[error("{resource} {id} does not exist")]
    InvalidReference { resource: &'static str, id: i64 },
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidReference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(e) if is_foreign_key_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidReference { .. } => "invalid_reference",
            AppError::Database(e) if is_foreign_key_violation(e) => "conflict",
            AppError::Database(_) => "database_error",
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, details) = match self {
            AppError::Validation(errors) => ("validation failed".to_string(), errors.clone()),
            AppError::Database(e) if is_foreign_key_violation(e) => (
                "operation violates a foreign-key constraint".to_string(),
                Vec::new(),
            ),
            // Store internals stay in the log
            AppError::Database(_) => ("database error".to_string(), Vec::new()),
            other => (other.to_string(), Vec::new()),
        };
        ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                details,
            },
        }
    }
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let text = e.body_text();
                AppError::Validation(vec![FieldError::new(rejected_field(&text), text)])
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Rejected path parameter: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

/// Best-effort name of the field a body deserialization error is about.
fn rejected_field(text: &str) -> String {
    if let Some(rest) = text.split("missing field `").nth(1) {
        if let Some((field, _)) = rest.split_once('`') {
            return field.to_string();
        }
    }
    // serde_path_to_error prefixes type errors with the field path
    if let Some(detail) = text.split("target type: ").nth(1) {
        if let Some((path, _)) = detail.split_once(": ") {
            if !path.is_empty() && !path.contains(' ') && path != "." {
                return path.to_string();
            }
        }
    }
    "body".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AppError) -> (StatusCode, ErrorBody) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_carries_details() {
        let (status, body) = body_of(AppError::Validation(vec![
            FieldError::new("name", "name must be 3-100 characters"),
            FieldError::new("description", "description must not be empty"),
        ]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "validation_error");
        assert_eq!(body.error.details.len(), 2);
        assert_eq!(body.error.details[0].field, "name");
    }

    #[tokio::test]
    async fn test_status_and_code_per_variant() {
        let cases = vec![
            (AppError::BadRequest("bad id".into()), StatusCode::BAD_REQUEST, "bad_request"),
            (
                AppError::NotFound { resource: "city", id: 9 },
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (AppError::Conflict("busy".into()), StatusCode::CONFLICT, "conflict"),
            (
                AppError::InvalidReference { resource: "continent", id: 999 },
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_reference",
            ),
            (
                AppError::Database(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
            ),
        ];

        for (error, status, code) in cases {
            let (actual_status, body) = body_of(error).await;
            assert_eq!(actual_status, status);
            assert_eq!(body.error.code, code);
            assert!(body.error.details.is_empty());
        }
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let error = AppError::NotFound { resource: "continent", id: 42 };
        assert_eq!(error.to_string(), "continent 42 not found");
    }

    #[test]
    fn test_rejected_field_extraction() {
        assert_eq!(
            rejected_field(
                "Failed to deserialize the JSON body into the target type: missing field `description` at line 1 column 16"
            ),
            "description"
        );
        assert_eq!(
            rejected_field(
                "Failed to deserialize the JSON body into the target type: population: invalid type: string \"many\", expected i64 at line 1 column 20"
            ),
            "population"
        );
        assert_eq!(rejected_field("something else entirely"), "body");
    }
}
