//! Error types for the Local Library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type.
///
/// Field-level validation failures and blocked deletions are not errors at
/// this level: handlers answer those with a re-rendered form or confirmation
/// page. Only outcomes that end the request on the error page live here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Full error detail, present only when the server runs in development
    /// configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Whether store-error detail is included in responses. Set once at startup
/// from `server.development`.
static SHOW_ERROR_DETAIL: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Enable full error detail in 500-class responses (development mode).
pub fn expose_error_detail(enabled: bool) {
    SHOW_ERROR_DETAIL.store(enabled, std::sync::atomic::Ordering::Relaxed);
}

fn detail_enabled() -> bool {
    SHOW_ERROR_DETAIL.load(std::sync::atomic::Ordering::Relaxed)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, detail) = match &self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                msg.clone(),
                None,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "StoreError",
                    "Database error".to_string(),
                    detail_enabled().then(|| e.to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
            detail,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
