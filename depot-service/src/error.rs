use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Document not found")]
    DocumentNotFound { document_id: i64 },

    #[error("Content-Length header required.")]
    LengthRequired,

    #[error("File is too large. Limit is {limit_mib:.1} MB.")]
    FileTooLarge { limit_mib: f64 },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Database error")]
    Database(#[from] DatabaseError),

    #[error("Job queue unavailable: {message}")]
    Queue { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Database errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed")]
    Connection(#[source] rusqlite::Error),

    #[error("Query failed")]
    Query(#[source] rusqlite::Error),

    #[error("Migration failed: {message}")]
    Migration { message: String },
}

/// Object store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object store connection failed: {message}")]
    Connection { message: String },

    #[error("Object store write failed for '{key}': {message}")]
    Put { key: String, message: String },

    #[error("Object store read failed for '{key}': {message}")]
    Get { key: String, message: String },

    #[error("Bucket '{bucket}' unavailable: {message}")]
    Bucket { bucket: String, message: String },
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DocumentNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::LengthRequired => StatusCode::LENGTH_REQUIRED,
            ServiceError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Store(_)
            | ServiceError::Database(_)
            | ServiceError::Queue { .. }
            | ServiceError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let response = ErrorResponse {
            detail: self.to_string(),
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = ServiceError::DocumentNotFound { document_id: 99999 }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"detail": "Document not found"}));
    }

    #[tokio::test]
    async fn test_length_required_response() {
        let response = ServiceError::LengthRequired.into_response();
        assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Content-Length header required.");
    }

    #[tokio::test]
    async fn test_file_too_large_mentions_limit() {
        let response = ServiceError::FileTooLarge { limit_mib: 25.0 }.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "File is too large. Limit is 25.0 MB.");
    }

    #[tokio::test]
    async fn test_store_error_surfaces_message() {
        let response = ServiceError::Store(StoreError::Put {
            key: "a.txt".to_string(),
            message: "connection refused".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("a.txt"));
        assert!(detail.contains("connection refused"));
    }
}
