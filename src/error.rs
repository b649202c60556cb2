//! Shared error handling utilities.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::DbPool;

/// Uniform message for credential failures. Using the same wording for
/// "no such account" and "wrong password" prevents account enumeration.
pub const INVALID_CREDENTIALS_MSG: &str = "Invalid email or password";

/// Error taxonomy for the auth and workspace services.
///
/// Every variant raised inside a transactional flow causes the surrounding
/// diesel transaction to roll back before the error reaches the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl ServiceError {
    pub fn into_api(self) -> (StatusCode, Json<ApiError>) {
        match self {
            ServiceError::NotFound(msg) => ApiError::not_found(msg, "NOT_FOUND"),
            ServiceError::Conflict(msg) => ApiError::conflict(msg, "CONFLICT"),
            ServiceError::Unauthorized(msg) => ApiError::unauthorized(msg, "INVALID_CREDENTIALS"),
            ServiceError::Hash(msg) => {
                error!(error = %msg, "Password hashing failed");
                ApiError::internal("Failed to process password", "PASSWORD_HASH_ERROR")
            }
            ServiceError::Database(e) => {
                error!(error = %e, "Database error");
                ApiError::db_error()
            }
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(
        error: impl Into<String>,
        code: impl Into<String>,
    ) -> (StatusCode, Json<Self>) {
        (StatusCode::BAD_REQUEST, Json(Self::new(error, code)))
    }

    pub fn unauthorized(
        error: impl Into<String>,
        code: impl Into<String>,
    ) -> (StatusCode, Json<Self>) {
        (StatusCode::UNAUTHORIZED, Json(Self::new(error, code)))
    }

    pub fn not_found(
        error: impl Into<String>,
        code: impl Into<String>,
    ) -> (StatusCode, Json<Self>) {
        (StatusCode::NOT_FOUND, Json(Self::new(error, code)))
    }

    pub fn conflict(error: impl Into<String>, code: impl Into<String>) -> (StatusCode, Json<Self>) {
        (StatusCode::CONFLICT, Json(Self::new(error, code)))
    }

    pub fn internal(error: impl Into<String>, code: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Self::new(error, code)),
        )
    }

    pub fn db_error() -> (StatusCode, Json<Self>) {
        Self::internal("Database error", "DB_ERROR")
    }
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn get_db_conn(
    pool: &DbPool,
) -> Result<
    diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
    (StatusCode, Json<ApiError>),
> {
    pool.get().map_err(|e| {
        error!(error = %e, "Database connection error");
        ApiError::internal("Database connection error", "DB_CONNECTION_ERROR")
    })
}
