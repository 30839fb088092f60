use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ImageId;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Image {0} not found")]
    ImageNotFound(ImageId),

    #[error("No images in rotation")]
    PoolEmpty,

    #[error("Not found")]
    NotFound,

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] ConfigError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApiError::ImageNotFound(id),
            other => ApiError::Store(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid image: {0}")]
    InvalidInput(String),

    #[error("Image has no pixels")]
    EmptyRaster,

    #[error("Image too large: {pixels} pixels (max {max})")]
    ImageTooLarge { pixels: u64, max: u64 },

    #[error("Invalid palette: {0}")]
    Palette(String),

    #[error("Bitmap encode error: {0}")]
    Encode(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Image {0} not found")]
    NotFound(ImageId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unsupported display size: {width}x{height}")]
    DisplaySize { width: u32, height: u32 },

    #[error("Invalid palette: {0}")]
    Palette(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidSettings(_) => StatusCode::BAD_REQUEST,
            ApiError::ImageNotFound(_) | ApiError::PoolEmpty | ApiError::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Render(RenderError::InvalidInput(_) | RenderError::EmptyRaster) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Render(RenderError::ImageTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Render(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
