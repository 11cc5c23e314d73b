//! HTTP-boundary error type with status-code mapping and a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::repository::{RepositoryError, RepositoryErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Raised by handlers after an existence check.
    NotFound,
    /// Raised by the service layer before any write.
    ValidationFailed,
    BadRequest,
    /// Transient backend failure; retry later.
    Unavailable,
    Internal,
}

impl ApiErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::ValidationFailed => "validation_failed",
            Self::BadRequest => "bad_request",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
    code: &'static str,
    status: u16,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    pub fn not_found(entity_type: impl Into<String>, entity_id: impl std::fmt::Display) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.to_string();
        Self {
            kind: ApiErrorKind::NotFound,
            message: format!("{entity_type} {entity_id} not found"),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::ValidationFailed, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Repository failures cross the HTTP boundary with internal detail
/// replaced; validation messages are client-authored input feedback and
/// pass through.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::ValidationFailed | RepositoryErrorKind::ConstraintViolation => {
                ApiErrorKind::ValidationFailed
            }
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                ApiErrorKind::Unavailable
            }
            RepositoryErrorKind::DatabaseError | RepositoryErrorKind::Other => ApiErrorKind::Internal,
        };
        let message = match kind {
            ApiErrorKind::NotFound | ApiErrorKind::ValidationFailed => err.message.clone(),
            ApiErrorKind::Unavailable => "service temporarily unavailable".to_string(),
            _ => "internal error".to_string(),
        };
        tracing::error!(
            operation = %err.operation,
            kind = %err.kind,
            entity_type = err.entity_type.as_deref(),
            entity_id = err.entity_id.as_deref(),
            "repository error: {}",
            err.message
        );
        Self {
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self.message);
        }
        let body = ApiErrorBody {
            error: self.message,
            code: self.kind.code(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiErrorKind::ValidationFailed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiErrorKind::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiErrorKind::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repository_validation_message_passes_through() {
        let err: ApiError = RepositoryError::validation_failed("category 999 does not exist").into();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(err.message, "category 999 does not exist");
    }

    #[test]
    fn repository_internal_detail_is_sanitized() {
        let err: ApiError = RepositoryError::database_error(
            crate::repository::RepositoryOperation::FindAll,
            "connection string user=admin password=hunter2",
        )
        .into();
        assert_eq!(err.kind, ApiErrorKind::Internal);
        assert_eq!(err.message, "internal error");
    }
}
