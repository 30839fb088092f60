use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for the scheduler's single persisted row
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn persist_next_run(&self, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// `None` when nothing was ever persisted
    async fn load_next_run(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
}

/// In-memory scheduler state, lost on restart
pub struct InMemoryScheduleStore {
    next_run: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self {
            next_run: Arc::new(RwLock::new(None)),
        }
    }
}

impl Default for InMemoryScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn persist_next_run(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        *self.next_run.write().await = Some(at);
        Ok(())
    }

    async fn load_next_run(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(*self.next_run.read().await)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ScheduleState {
    next_run_at: DateTime<Utc>,
}

/// Scheduler state in a small JSON file
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write leaves the previous state intact.
pub struct FileScheduleStore {
    path: PathBuf,
}

impl FileScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ScheduleStore for FileScheduleStore {
    async fn persist_next_run(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&ScheduleState { next_run_at: at })?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), next_run_at = %at, "Persisted schedule");
        Ok(())
    }

    async fn load_next_run(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let state: ScheduleState = serde_json::from_slice(&bytes)?;
                Ok(Some(state.next_run_at))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
