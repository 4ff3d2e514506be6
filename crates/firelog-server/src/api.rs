//! Account handlers and the error type shared by every API handler.

use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use firelog_store::{authenticate, create_user, StoreError};
use firelog_types::UserId;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Request body for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response body for successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    /// The assigned database ID for the new account.
    pub user_id: UserId,
}

/// Response body for successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: UserId,
}

/// Response body for operations that return only a confirmation.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Conflict(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error("request timed out")]
    Timeout,
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Machine-readable code carried next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Conflict(_) => "conflict",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::NotFound(_) => "not_found",
            ApiError::Timeout => "timeout",
            ApiError::InternalServerError(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Conflict(_) | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => ApiError::Conflict(e.to_string()),
            StoreError::InvalidCredentials => ApiError::InvalidCredentials,
            StoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StoreError::PasswordHash | StoreError::Database(_) => {
                ApiError::InternalServerError(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Runs `op` on a pooled connection inside a blocking task.
///
/// The connection is returned to the pool when the task finishes, whether
/// `op` succeeded or not.
pub(crate) async fn with_conn<T, F>(state: Arc<AppState>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {}", e)))?;
        op(&conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))?
}

/// Handler for `POST /register`.
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let username = payload.username.clone();
    let user_id = with_conn(state, move |conn| {
        create_user(conn, &payload.username, &payload.password)
    })
    .await?;

    tracing::info!(user_id, username = %username, "user registered");

    Ok(Json(RegisterResponse {
        message: "registered".to_string(),
        user_id,
    }))
}

/// Handler for `POST /login`.
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.clone();
    let result = with_conn(state, move |conn| {
        authenticate(conn, &payload.username, &payload.password)
    })
    .await;

    match result {
        Ok(user_id) => {
            tracing::info!(user_id, "login succeeded");
            Ok(Json(LoginResponse { user_id }))
        }
        Err(e) => {
            if matches!(e, ApiError::InvalidCredentials) {
                tracing::debug!(username = %username, "login rejected");
            }
            Err(e)
        }
    }
}
