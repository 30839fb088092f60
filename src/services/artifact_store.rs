use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for blob storage of uploaded sources and rendered bitmaps
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Unique key for an uploaded source: `{millis}-{12 hex}-{name}`
pub fn raster_key(name: &str, now: DateTime<Utc>) -> String {
    let nonce: [u8; 6] = rand::thread_rng().gen();
    format!("{}-{}-{}", now.timestamp_millis(), hex::encode(nonce), name)
}

/// Content address of a rendered bitmap: SHA-256 hex
pub fn rendered_key(bitmap: &[u8]) -> String {
    hex::encode(Sha256::digest(bitmap))
}

/// In-memory artifact storage
pub struct InMemoryArtifactStore {
    blobs: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(key.to_string(), Arc::new(bytes));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Arc<Vec<u8>>>, StoreError> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        blobs.remove(key);
        Ok(())
    }
}
