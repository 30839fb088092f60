//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::header::CONNECTION,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::models::AppConfig;
use crate::services::{
    ArtifactStore, FileScheduleStore, ImageStore, InMemoryArtifactStore, InMemoryImageStore,
    InMemorySettingsStore, RenderService, RotationScheduler, ScheduleStore, SettingsStore,
};

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub images: Arc<dyn ImageStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub renderer: Arc<RenderService>,
    pub scheduler: Arc<RotationScheduler>,
}

/// Create application state with the scheduler persisted to `config.state_file`.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let schedule = Arc::new(FileScheduleStore::new(config.state_file.clone()));
    create_app_state_with(config, schedule)
}

/// Create application state around an explicit schedule store.
pub fn create_app_state_with(
    config: &AppConfig,
    schedule: Arc<dyn ScheduleStore>,
) -> anyhow::Result<AppState> {
    config.validate()?;

    let images: Arc<dyn ImageStore> = Arc::new(InMemoryImageStore::new());
    let settings: Arc<dyn SettingsStore> =
        Arc::new(InMemorySettingsStore::new(config.settings.clone()));
    let artifacts: Arc<dyn ArtifactStore> = Arc::new(InMemoryArtifactStore::new());
    let renderer = Arc::new(RenderService::new(&config.display)?);
    let scheduler = Arc::new(RotationScheduler::new(
        images.clone(),
        settings.clone(),
        schedule,
        artifacts.clone(),
    ));

    Ok(AppState {
        images,
        settings,
        artifacts,
        renderer,
        scheduler,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// It includes the `Connection: close` header because e-ink frame
/// firmware opens a fresh connection per fetch and never reuses it.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Display endpoints
        .route("/api/images", post(api::upload_image))
        .route("/api/images/current", get(api::current_image))
        .route("/api/images/current/bitmap", get(api::current_bitmap))
        .route("/api/images/:id/bitmap", get(api::image_bitmap))
        .route("/api/schedule", get(api::get_schedule))
        // Admin endpoints
        .route("/api/admin/images", get(api::list_images))
        .route("/api/admin/favorites", get(api::list_favorites))
        .route(
            "/api/admin/images/:id/favorite",
            post(api::add_favorite).delete(api::remove_favorite),
        )
        .route("/api/admin/images/:id/requeue", post(api::requeue_image))
        .route(
            "/api/admin/images/:id",
            axum::routing::delete(api::delete_image),
        )
        .route(
            "/api/admin/settings",
            get(api::get_settings).put(api::update_settings),
        )
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CONNECTION,
            axum::http::HeaderValue::from_static("close"),
        ))
}
