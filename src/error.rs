use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// ApiError
///
/// The single error taxonomy for the API. Every handler returns `Result<T, ApiError>`,
/// and the `IntoResponse` impl below maps each variant to its HTTP status and a uniform
/// `{"error": "..."}` JSON body.
///
/// Internal faults (database, storage) are logged with full detail but always answered
/// with a generic message so no connection strings, SQL, or bucket names leak to clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed required fields in the request payload.
    #[error("{0}")]
    Validation(String),

    /// A specifically requested id does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid, or expired admin credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Any unexpected database fault. The wrapped error is for logs only.
    #[error("Internal server error")]
    Database(#[from] sqlx::Error),

    /// Any unexpected object-storage fault. The wrapped message is for logs only.
    #[error("Internal server error")]
    Storage(String),

    /// Any other unexpected fault (token signing, encoding). Logged, never leaked.
    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Storage(msg) => {
                tracing::error!("storage error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
