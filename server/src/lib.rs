//! # Timer Sounds asset store service
//!
//! HTTP surface over an [`AssetStore`].
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/upload` | Multipart upload, field `sounds`, up to 20 files |
//! | GET | `/sounds` | JSON array of asset names |
//! | GET | `/random` | `{ "file": name }`, 404 when empty |
//! | GET | `/uploads/{name}` | Raw asset bytes |
//! | DELETE | `/delete/{name}` | Remove one asset |
//!
//! Errors are `{ "message": ... }` bodies (see [`ApiError`]). Any origin may
//! call the service.

pub mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use timer_sounds_core::AssetStore;
use timer_sounds_types::ServerConfig;

pub use error::ApiError;

/// Shared state passed to all request handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn AssetStore>,
    max_files_per_upload: usize,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn AssetStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            max_files_per_upload: config.max_files_per_upload,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Build the router with all asset endpoints.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/sounds", get(handlers::list_sounds))
        .route("/random", get(handlers::random_sound))
        .route("/uploads/{name}", get(handlers::retrieve_sound))
        .route("/delete/{name}", delete(handlers::delete_sound))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
