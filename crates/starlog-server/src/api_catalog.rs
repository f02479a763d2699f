//! Read-only listing handlers for the reference dataset.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::extract::{Extension, Json, Path};
use starlog_models::{
    get_character, get_planet, list_characters, list_native_characters, list_planets, Character,
    Planet,
};
use std::sync::Arc;

/// Handler for `GET /api/planets`.
pub async fn list_planets_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Planet>>, ApiError> {
    with_conn(&state, list_planets).await.map(Json)
}

/// Handler for `GET /api/planets/{planetId}`.
pub async fn get_planet_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(planet_id): Path<i64>,
) -> Result<Json<Planet>, ApiError> {
    with_conn(&state, move |conn| get_planet(conn, planet_id))
        .await
        .map(Json)
}

/// Handler for `GET /api/planets/{planetId}/characters`.
pub async fn list_native_characters_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(planet_id): Path<i64>,
) -> Result<Json<Vec<Character>>, ApiError> {
    with_conn(&state, move |conn| list_native_characters(conn, planet_id))
        .await
        .map(Json)
}

/// Handler for `GET /api/characters`.
pub async fn list_characters_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Character>>, ApiError> {
    with_conn(&state, list_characters).await.map(Json)
}

/// Handler for `GET /api/characters/{characterId}`.
pub async fn get_character_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(character_id): Path<i64>,
) -> Result<Json<Character>, ApiError> {
    with_conn(&state, move |conn| get_character(conn, character_id))
        .await
        .map(Json)
}
