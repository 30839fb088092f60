use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::{ImageId, ImageRecord, NewImage};
use crate::server::AppState;
use crate::services::artifact_store::{raster_key, rendered_key};

/// Query parameters for image upload
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original file name; defaults to "upload"
    #[serde(default)]
    pub name: Option<String>,
}

/// Strip any client-side path and fall back to a fixed name
fn upload_name(raw: Option<&str>) -> String {
    raw.and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("upload")
        .to_string()
}

/// Upload a photo
///
/// The raw request body is the image file. It is rendered for the display
/// immediately and joins the rotation pool as the newest entry.
#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    params(UploadQuery),
    responses(
        (status = 201, description = "Image stored and rendered", body = ImageRecord),
        (status = 400, description = "Body is not a decodable image"),
        (status = 413, description = "Image too large"),
    ),
    tag = "Images"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<ImageRecord>), ApiError> {
    let name = upload_name(query.name.as_deref());
    let settings = state.settings.load_settings().await?;

    let bitmap = state.renderer.render(body.to_vec(), &settings).await?;

    let now = Utc::now();
    let raster_key = raster_key(&name, now);
    let rendered_key = rendered_key(&bitmap);
    let record = state
        .scheduler
        .add_image(
            NewImage {
                name,
                raster_key,
                rendered_key,
                created_at: now,
            },
            body.to_vec(),
            bitmap,
        )
        .await?;

    tracing::info!(
        image_id = %record.id,
        name = %record.name,
        source_bytes = body.len(),
        "Image uploaded"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get the current image
///
/// The current image is the visible image that has waited longest since it
/// was queued.
#[utoipa::path(
    get,
    path = "/api/images/current",
    responses(
        (status = 200, description = "Image currently on display", body = ImageRecord),
        (status = 404, description = "Rotation pool is empty"),
    ),
    tag = "Images"
)]
pub async fn current_image(State(state): State<AppState>) -> Result<Json<ImageRecord>, ApiError> {
    let record = state
        .images
        .find_oldest_visible()
        .await?
        .ok_or(ApiError::PoolEmpty)?;
    Ok(Json(record))
}

/// Get the current image as a display bitmap
#[utoipa::path(
    get,
    path = "/api/images/current/bitmap",
    responses(
        (status = 200, description = "4-bit indexed BMP", content_type = "image/bmp"),
        (status = 404, description = "Rotation pool is empty"),
    ),
    tag = "Images"
)]
pub async fn current_bitmap(State(state): State<AppState>) -> Result<Response, ApiError> {
    let record = state
        .images
        .find_oldest_visible()
        .await?
        .ok_or(ApiError::PoolEmpty)?;
    bitmap_response(&state, &record).await
}

/// Get any image's display bitmap
#[utoipa::path(
    get,
    path = "/api/images/{id}/bitmap",
    params(("id" = u64, Path, description = "Image id")),
    responses(
        (status = 200, description = "4-bit indexed BMP", content_type = "image/bmp"),
        (status = 404, description = "Unknown image"),
    ),
    tag = "Images"
)]
pub async fn image_bitmap(
    State(state): State<AppState>,
    Path(id): Path<ImageId>,
) -> Result<Response, ApiError> {
    let record = state
        .images
        .get(id)
        .await?
        .ok_or(ApiError::ImageNotFound(id))?;
    bitmap_response(&state, &record).await
}

async fn bitmap_response(state: &AppState, record: &ImageRecord) -> Result<Response, ApiError> {
    let bitmap = state
        .artifacts
        .get(&record.rendered_key)
        .await?
        .ok_or_else(|| {
            tracing::warn!(image_id = %record.id, key = %record.rendered_key, "Bitmap artifact missing");
            ApiError::NotFound
        })?;

    tracing::debug!(image_id = %record.id, bytes = bitmap.len(), "Serving bitmap");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/bmp".to_string()),
            (header::CONTENT_LENGTH, bitmap.len().to_string()),
            (header::ETAG, format!("\"{}\"", record.rendered_key)),
        ],
        Bytes::from(bitmap.as_ref().clone()),
    )
        .into_response())
}
