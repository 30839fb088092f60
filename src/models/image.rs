use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Image identifier, assigned by the store on insert
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ImageId(u64);

impl ImageId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImageId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// An uploaded photo and its place in the rotation pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Original upload name
    pub name: String,
    /// Artifact key of the uploaded source bytes
    pub raster_key: String,
    /// Artifact key of the display-ready bitmap
    pub rendered_key: String,
    /// Part of the pool that rotates through the display
    pub is_visible: bool,
    /// Reserve pool used when no visible image is left
    pub is_favorite: bool,
    /// When the image last entered the visible pool; oldest rotates out first
    pub last_queued_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when adding an image
#[derive(Debug, Clone)]
pub struct NewImage {
    pub name: String,
    pub raster_key: String,
    pub rendered_key: String,
    pub created_at: DateTime<Utc>,
}

impl NewImage {
    /// Build the stored record: new uploads enter the visible pool at once.
    pub fn into_record(self, id: ImageId) -> ImageRecord {
        ImageRecord {
            id,
            name: self.name,
            raster_key: self.raster_key,
            rendered_key: self.rendered_key,
            is_visible: true,
            is_favorite: false,
            last_queued_at: self.created_at,
            created_at: self.created_at,
        }
    }
}
