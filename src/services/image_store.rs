use crate::error::StoreError;
use crate::models::{ImageId, ImageRecord, NewImage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for image record persistence
///
/// Queries ordered by `last_queued_at` break ties by ascending id so the
/// answer is stable when timestamps collide.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Visible image with the oldest `last_queued_at`
    async fn find_oldest_visible(&self) -> Result<Option<ImageRecord>, StoreError>;

    /// Favorite with the oldest `last_queued_at`, visible or not
    async fn find_oldest_favorite(&self) -> Result<Option<ImageRecord>, StoreError>;

    async fn set_visible(&self, id: ImageId, visible: bool) -> Result<ImageRecord, StoreError>;

    async fn count_visible(&self) -> Result<u64, StoreError>;

    async fn touch_queued_at(
        &self,
        id: ImageId,
        at: DateTime<Utc>,
    ) -> Result<ImageRecord, StoreError>;

    /// Store a new record and assign its id
    async fn insert(&self, image: NewImage) -> Result<ImageRecord, StoreError>;

    async fn get(&self, id: ImageId) -> Result<Option<ImageRecord>, StoreError>;

    /// All records, newest upload first
    async fn list(&self) -> Result<Vec<ImageRecord>, StoreError>;

    /// Favorites, newest upload first
    async fn list_favorites(&self) -> Result<Vec<ImageRecord>, StoreError>;

    async fn set_favorite(&self, id: ImageId, favorite: bool) -> Result<ImageRecord, StoreError>;

    /// Remove a record, returning it
    async fn delete(&self, id: ImageId) -> Result<ImageRecord, StoreError>;
}

struct Records {
    next_id: u64,
    images: BTreeMap<ImageId, ImageRecord>,
}

/// In-memory image record storage
pub struct InMemoryImageStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Records {
                next_id: 1,
                images: BTreeMap::new(),
            })),
        }
    }

    async fn update(
        &self,
        id: ImageId,
        apply: impl FnOnce(&mut ImageRecord) + Send,
    ) -> Result<ImageRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .images
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        apply(record);
        Ok(record.clone())
    }

    async fn oldest_where(&self, keep: impl Fn(&ImageRecord) -> bool + Send) -> Option<ImageRecord> {
        let records = self.records.read().await;
        // BTreeMap iterates by id, so min_by_key keeps the lowest id on ties
        records
            .images
            .values()
            .filter(|r| keep(r))
            .min_by_key(|r| r.last_queued_at)
            .cloned()
    }

    async fn newest_first(&self, keep: impl Fn(&ImageRecord) -> bool + Send) -> Vec<ImageRecord> {
        let records = self.records.read().await;
        let mut list: Vec<ImageRecord> = records.images.values().filter(|r| keep(r)).cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        list
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn find_oldest_visible(&self) -> Result<Option<ImageRecord>, StoreError> {
        Ok(self.oldest_where(|r| r.is_visible).await)
    }

    async fn find_oldest_favorite(&self) -> Result<Option<ImageRecord>, StoreError> {
        Ok(self.oldest_where(|r| r.is_favorite).await)
    }

    async fn set_visible(&self, id: ImageId, visible: bool) -> Result<ImageRecord, StoreError> {
        self.update(id, |r| r.is_visible = visible).await
    }

    async fn count_visible(&self) -> Result<u64, StoreError> {
        let records = self.records.read().await;
        Ok(records.images.values().filter(|r| r.is_visible).count() as u64)
    }

    async fn touch_queued_at(
        &self,
        id: ImageId,
        at: DateTime<Utc>,
    ) -> Result<ImageRecord, StoreError> {
        self.update(id, |r| r.last_queued_at = at).await
    }

    async fn insert(&self, image: NewImage) -> Result<ImageRecord, StoreError> {
        let mut records = self.records.write().await;
        let id = ImageId::new(records.next_id);
        records.next_id += 1;
        let record = image.into_record(id);
        records.images.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ImageId) -> Result<Option<ImageRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.images.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ImageRecord>, StoreError> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn list_favorites(&self) -> Result<Vec<ImageRecord>, StoreError> {
        Ok(self.newest_first(|r| r.is_favorite).await)
    }

    async fn set_favorite(&self, id: ImageId, favorite: bool) -> Result<ImageRecord, StoreError> {
        self.update(id, |r| r.is_favorite = favorite).await
    }

    async fn delete(&self, id: ImageId) -> Result<ImageRecord, StoreError> {
        let mut records = self.records.write().await;
        records.images.remove(&id).ok_or(StoreError::NotFound(id))
    }
}
