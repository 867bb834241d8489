use axum::http::StatusCode;
use thiserror::Error;

use super::response::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid URL provided: {0}")]
    InvalidUrl(String),

    #[error("Dependency unavailable: {0}")]
    TransientDependency(String),

    #[error("Job {job_id} on '{queue}' failed after {attempts} attempts")]
    ExhaustedRetry {
        queue: String,
        job_id: uuid::Uuid,
        attempts: u32,
    },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TransientDependency(_) | AppError::ExhaustedRetry { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(db_err.message().to_string());
            }
        }
        AppError::TransientDependency(format!("database: {}", e))
    }
}

impl From<lapin::Error> for AppError {
    fn from(e: lapin::Error) -> Self {
        AppError::TransientDependency(format!("queue: {}", e))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Validation(format!("malformed payload: {}", e))
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        let status = e.status_code();
        ApiError(e.to_string(), status)
    }
}
