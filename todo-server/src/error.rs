//! Service errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced todo does not exist (404).
    #[error("todo {0} not found")]
    NotFound(i64),

    /// The payload failed validation (400).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Storage failure (500, logged, never echoed to the client).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures while bringing the server up or serving connections.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ServiceError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ServiceError::NotFound(7).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "todo 7 not found");
    }

    #[tokio::test]
    async fn validation_is_400() {
        let response = ServiceError::Validation("title must not be blank".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn database_error_is_500_with_generic_message() {
        let response = ServiceError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "an internal error occurred");
    }
}
