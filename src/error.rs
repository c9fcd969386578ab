use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

// SQLSTATE codes surfaced by Postgres.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const USERS_EMAIL_KEY: &str = "users_email_key";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return unique_violation(db_err.constraint());
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return AppError::Validation("Referenced user does not exist".into());
                }
                _ => {}
            }
        }
        AppError::Database(e)
    }
}

fn unique_violation(constraint: Option<&str>) -> AppError {
    match constraint {
        Some(USERS_EMAIL_KEY) => AppError::Conflict("Email already in use".into()),
        other => {
            warn!(constraint = ?other, "unique constraint violated");
            AppError::Conflict("Resource already exists".into())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(r: JsonRejection) -> Self {
        AppError::Validation(r.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(r: PathRejection) -> Self {
        AppError::Validation(r.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(r: QueryRejection) -> Self {
        AppError::Validation(r.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Database(e) => {
                error!(error = ?e, "database error");
                "Server error".to_string()
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "internal error");
                "Server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
