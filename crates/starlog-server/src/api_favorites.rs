//! Favorite handlers.
//!
//! Provides:
//! - `GET /api/users/{userId}/favorites`: both favorite lists
//! - `POST /api/users/{userId}/favorites/{kind}/{targetId}`: add
//! - `DELETE /api/users/{userId}/favorites/{kind}/{targetId}`: remove
//!
//! `kind` is `planets` or `characters` (singular forms are accepted too).

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use starlog_models::{add_favorite, list_favorites, remove_favorite, Favorite, UserFavorites};
use starlog_types::FavoriteKind;
use std::sync::Arc;

fn parse_kind(kind: &str) -> Result<FavoriteKind, ApiError> {
    kind.parse()
        .map_err(|e: starlog_types::ParseFavoriteKindError| {
            let expected: Vec<&str> = FavoriteKind::ALL.iter().map(|k| k.plural()).collect();
            ApiError::BadRequest(format!("{e}. Expected one of: {}", expected.join(", ")))
        })
}

/// Handler for `GET /api/users/{userId}/favorites`.
pub async fn list_favorites_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserFavorites>, ApiError> {
    with_conn(&state, move |conn| list_favorites(conn, user_id))
        .await
        .map(Json)
}

/// Handler for `POST /api/users/{userId}/favorites/{kind}/{targetId}`.
///
/// Responds `201 Created` with the new favorite, `404` if the user or the
/// target is missing, `409` if it is already a favorite.
pub async fn add_favorite_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((user_id, kind, target_id)): Path<(i64, String, i64)>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let kind = parse_kind(&kind)?;
    let favorite =
        with_conn(&state, move |conn| add_favorite(conn, kind, user_id, target_id)).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Handler for `DELETE /api/users/{userId}/favorites/{kind}/{targetId}`.
pub async fn remove_favorite_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((user_id, kind, target_id)): Path<(i64, String, i64)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    with_conn(&state, move |conn| {
        remove_favorite(conn, kind, user_id, target_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
