use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Same as `NotFound`, but rendered as `{"message": ...}`.
    #[error("Not found: {0}")]
    RecordNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The raw driver error handed back to clients for storage failures.
    fn storage_payload(&self) -> Value {
        match self {
            AppError::Database(rusqlite::Error::SqliteFailure(err, msg)) => json!({
                "code": format!("{:?}", err.code),
                "errno": err.extended_code,
                "message": msg.clone().unwrap_or_else(|| err.to_string()),
            }),
            AppError::Database(e) => json!({ "code": "SQLITE_ERROR", "message": e.to_string() }),
            AppError::Pool(e) => json!({ "code": "POOL_ERROR", "message": e.to_string() }),
            _ => Value::Null,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!(msg)),
            AppError::RecordNotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!("Not authenticated!")),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            // Storage failures keep status 200 and echo the driver error.
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::OK, self.storage_payload())
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::OK, self.storage_payload())
            }
            AppError::Hash(e) => {
                tracing::error!("Password hashing error: {}", e);
                internal()
            }
            AppError::Token(e) => {
                tracing::error!("Token error: {}", e);
                internal()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                internal()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!("Internal server error"),
    )
}

pub type AppResult<T> = Result<T, AppError>;
