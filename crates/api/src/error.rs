use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracklist_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tracklist_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body could not be parsed into the expected schema.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(format!("Invalid JSON data: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(format!("Invalid track id: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            // Validation keeps the per-field list next to the aggregated message.
            AppError::Core(CoreError::Validation(violations)) => json!({
                "error": violations.message(),
                "code": "VALIDATION_ERROR",
                "fields": violations,
            }),
            AppError::Core(CoreError::NotFound { entity, id }) => json!({
                "error": format!("{entity} with id {id} not found"),
                "code": "NOT_FOUND",
            }),
            AppError::MalformedRequest(msg) => json!({
                "error": msg,
                "code": "MALFORMED_REQUEST",
            }),
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                json!({
                    "error": "An internal error occurred",
                    "code": "INTERNAL_ERROR",
                })
            }
        };

        (self.status(), axum::Json(body)).into_response()
    }
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(CoreError::Validation(_)) | AppError::MalformedRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Core(CoreError::Internal(_)) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
