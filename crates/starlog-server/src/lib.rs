//! Starlog server library logic.
//!
//! A thin HTTP surface over `starlog-models`: listing endpoints for the
//! reference dataset, account management, and favorite add/remove.
//! There is no session layer; any caller can act for any user ID.

pub mod api;
pub mod api_catalog;
pub mod api_favorites;
pub mod config;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use starlog_db::DbPool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/users",
            get(api::list_users_handler).post(api::create_user_handler),
        )
        .route("/api/login", post(api::login_handler))
        .route(
            "/api/users/{userId}",
            get(api::get_user_handler).delete(api::delete_user_handler),
        )
        .route(
            "/api/users/{userId}/favorites",
            get(api_favorites::list_favorites_handler),
        )
        .route(
            "/api/users/{userId}/favorites/{kind}/{targetId}",
            post(api_favorites::add_favorite_handler)
                .delete(api_favorites::remove_favorite_handler),
        )
        .route("/api/planets", get(api_catalog::list_planets_handler))
        .route(
            "/api/planets/{planetId}",
            get(api_catalog::get_planet_handler),
        )
        .route(
            "/api/planets/{planetId}/characters",
            get(api_catalog::list_native_characters_handler),
        )
        .route(
            "/api/characters",
            get(api_catalog::list_characters_handler),
        )
        .route(
            "/api/characters/{characterId}",
            get(api_catalog::get_character_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
