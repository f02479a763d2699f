//! API error mapping, the blocking-database bridge, and user handlers.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use starlog_models::{
    authenticate, create_user, delete_user, get_user, list_users, ModelError, NewUser, User,
};
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ModelError::Conflict(msg) => ApiError::Conflict(msg),
            ModelError::Validation { .. } => ApiError::BadRequest(e.to_string()),
            ModelError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            ref err => {
                tracing::error!(error = %err, "model operation failed");
                ApiError::InternalServerError(e.to_string())
            }
        }
    }
}

/// Runs a model operation on a pooled connection off the async runtime.
pub(crate) async fn with_conn<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T, ModelError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {e}")))?;
        op(&conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "database task join error");
        ApiError::InternalServerError(format!("task join error: {e}"))
    })?
}

/// Handler for `GET /api/users`.
pub async fn list_users_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    with_conn(&state, list_users).await.map(Json)
}

/// Handler for `POST /api/users`.
///
/// Signs up a new user. Responds `201 Created` with the serialized user
/// (never including the password).
pub async fn create_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = with_conn(&state, move |conn| create_user(conn, &payload)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for `GET /api/users/{userId}`.
pub async fn get_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    with_conn(&state, move |conn| get_user(conn, user_id))
        .await
        .map(Json)
}

/// Handler for `DELETE /api/users/{userId}`.
///
/// Deletes the account and, through the schema's cascade, its favorites.
pub async fn delete_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    with_conn(&state, move |conn| delete_user(conn, user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Handler for `POST /api/login`.
///
/// Checks an email/password pair and returns the matching active user.
/// No session is issued.
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    with_conn(&state, move |conn| {
        authenticate(conn, &payload.email, &payload.password)
    })
    .await
    .map(Json)
}
