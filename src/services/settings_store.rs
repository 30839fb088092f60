use crate::error::StoreError;
use crate::models::Settings;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for runtime settings persistence
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(&self) -> Result<Settings, StoreError>;

    async fn save_settings(&self, settings: Settings) -> Result<(), StoreError>;
}

/// In-memory settings storage, seeded from config
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<Settings>>,
}

impl InMemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(initial)),
        }
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save_settings(&self, settings: Settings) -> Result<(), StoreError> {
        *self.settings.write().await = settings;
        Ok(())
    }
}
