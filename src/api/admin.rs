//! Pool administration and runtime settings.
//!
//! Authentication is out of scope here; put these routes behind whatever
//! gateway guards the deployment.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use crate::error::ApiError;
use crate::models::{ImageId, ImageRecord, Settings};
use crate::server::AppState;

/// List all images
#[utoipa::path(
    get,
    path = "/api/admin/images",
    responses((status = 200, description = "All images, newest first", body = [ImageRecord])),
    tag = "Admin"
)]
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    Ok(Json(state.images.list().await?))
}

/// List favorite images
#[utoipa::path(
    get,
    path = "/api/admin/favorites",
    responses((status = 200, description = "Favorites, newest first", body = [ImageRecord])),
    tag = "Admin"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    Ok(Json(state.images.list_favorites().await?))
}

/// Mark an image as favorite
///
/// Favorites refill the rotation when the last visible image rotates out.
#[utoipa::path(
    post,
    path = "/api/admin/images/{id}/favorite",
    params(("id" = u64, Path, description = "Image id")),
    responses(
        (status = 200, description = "Updated image", body = ImageRecord),
        (status = 404, description = "Unknown image"),
    ),
    tag = "Admin"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<Json<ImageRecord>, ApiError> {
    Ok(Json(state.scheduler.set_favorite(id, true).await?))
}

/// Unmark an image as favorite
#[utoipa::path(
    delete,
    path = "/api/admin/images/{id}/favorite",
    params(("id" = u64, Path, description = "Image id")),
    responses(
        (status = 200, description = "Updated image", body = ImageRecord),
        (status = 404, description = "Unknown image"),
    ),
    tag = "Admin"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<Json<ImageRecord>, ApiError> {
    Ok(Json(state.scheduler.set_favorite(id, false).await?))
}

/// Requeue an image
///
/// Makes the image visible again at the back of the queue. The rotation
/// timer keeps its current deadline.
#[utoipa::path(
    post,
    path = "/api/admin/images/{id}/requeue",
    params(("id" = u64, Path, description = "Image id")),
    responses(
        (status = 200, description = "Updated image", body = ImageRecord),
        (status = 404, description = "Unknown image"),
    ),
    tag = "Admin"
)]
pub async fn requeue_image(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<Json<ImageRecord>, ApiError> {
    Ok(Json(state.scheduler.requeue(id, Utc::now()).await?))
}

/// Delete an image and its artifacts
#[utoipa::path(
    delete,
    path = "/api/admin/images/{id}",
    params(("id" = u64, Path, description = "Image id")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Unknown image"),
    ),
    tag = "Admin"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<StatusCode, ApiError> {
    state.scheduler.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get runtime settings
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, description = "Current settings", body = Settings)),
    tag = "Admin"
)]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.settings.load_settings().await?))
}

/// Replace runtime settings
///
/// Rotation settings apply from the next tick, render settings from the
/// next upload. Already rendered bitmaps are not re-rendered.
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = Settings,
    responses(
        (status = 200, description = "Settings saved", body = Settings),
        (status = 400, description = "A value is out of range"),
    ),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, ApiError> {
    settings.validate()?;
    state.settings.save_settings(settings.clone()).await?;
    tracing::info!(?settings, "Settings updated");
    Ok(Json(settings))
}
