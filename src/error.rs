use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::users::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authentication(String),

    #[error("storage error: {0}")]
    Storage(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::Authentication(msg) => {
                msg.clone()
            }
            AppError::Storage(e) => format!("Server Error: {e:#}"),
            AppError::Internal(_) => "Server Error".to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(_) => AppError::Conflict("Email already exists".into()),
            StoreError::Backend(e) => AppError::Storage(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Storage(e) => tracing::error!(error = %e, "storage failure"),
            AppError::Internal(e) => tracing::error!(error = %e, "internal failure"),
            _ => tracing::debug!(%status, error = %self, "request rejected"),
        }
        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_its_status() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Storage(anyhow::anyhow!("down")), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err:?}");
        }
    }

    #[test]
    fn storage_message_passes_through() {
        let err = AppError::Storage(anyhow::anyhow!("connection reset"));
        assert_eq!(err.message(), "Server Error: connection reset");
    }

    #[test]
    fn internal_message_is_generic() {
        let err = AppError::Internal(anyhow::anyhow!("argon2 exploded"));
        assert_eq!(err.message(), "Server Error");
    }

    #[test]
    fn duplicate_email_becomes_conflict() {
        let err: AppError = StoreError::DuplicateEmail("a@b.com".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
