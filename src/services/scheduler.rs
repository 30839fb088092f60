//! Rotation scheduler.
//!
//! A single timer decides which image is current. Each tick rotates the
//! oldest visible image out, refills the pool from favorites when it would
//! otherwise be empty, persists the next run time and arms the next tick.
//!
//! ```text
//! Idle --resume--> Scheduled --timer--> Rotating --persist--> Scheduled
//! ```
//!
//! Ticks, uploads and admin pool mutations share one async mutex, so they
//! never interleave. Reading the remaining time only touches an atomic.

use crate::error::StoreError;
use crate::models::{ImageId, ImageRecord, NewImage};
use crate::services::{ArtifactStore, ImageStore, ScheduleStore, SettingsStore};
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Delay before the next attempt after a failed tick.
pub const RETRY_DELAY: Duration = Duration::hours(1);

const MS_PER_HOUR: f64 = 3_600_000.0;
const UNSCHEDULED: i64 = i64::MIN;

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Image hidden by this tick
    pub rotated_out: Option<ImageId>,
    /// Favorite brought back because the pool ran dry
    pub promoted: Option<ImageId>,
    /// Visible images after the tick
    pub remaining: u64,
    /// No visible image and no favorite to promote
    pub pool_empty: bool,
    pub next_run_at: DateTime<Utc>,
    /// The tick hit a store error and fell back to the retry delay
    pub failed: bool,
}

/// Time one image stays current.
///
/// `total_cycle_hours / remaining`, never below one hour and never above
/// `ceiling_hours`. An empty pool counts as one image.
pub fn compute_interval(total_cycle_hours: u32, ceiling_hours: u32, remaining: u64) -> Duration {
    let ceiling = ceiling_hours.max(1) as f64;
    let hours = (total_cycle_hours as f64 / remaining.max(1) as f64).clamp(1.0, ceiling);
    Duration::milliseconds((hours * MS_PER_HOUR).round() as i64)
}

/// Delay before the first tick after a (re)start.
///
/// A persisted run time in the future is honoured; anything else means the
/// tick is overdue and runs immediately.
pub fn startup_delay(next_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> std::time::Duration {
    next_run
        .and_then(|at| (at - now).to_std().ok())
        .unwrap_or(std::time::Duration::ZERO)
}

/// Persistent, crash-recoverable rotation timer
pub struct RotationScheduler {
    images: Arc<dyn ImageStore>,
    settings: Arc<dyn SettingsStore>,
    schedule: Arc<dyn ScheduleStore>,
    artifacts: Arc<dyn ArtifactStore>,
    pool_lock: Mutex<()>,
    next_run_ms: AtomicI64,
}

impl RotationScheduler {
    pub fn new(
        images: Arc<dyn ImageStore>,
        settings: Arc<dyn SettingsStore>,
        schedule: Arc<dyn ScheduleStore>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            images,
            settings,
            schedule,
            artifacts,
            pool_lock: Mutex::new(()),
            next_run_ms: AtomicI64::new(UNSCHEDULED),
        }
    }

    /// Cached time of the next tick, if one is armed
    pub fn next_run_at(&self) -> Option<DateTime<Utc>> {
        match self.next_run_ms.load(Ordering::Acquire) {
            UNSCHEDULED => None,
            ms => DateTime::from_timestamp_millis(ms),
        }
    }

    /// Milliseconds until the next tick, 0 when overdue or unscheduled
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms_at(Utc::now())
    }

    pub fn remaining_ms_at(&self, now: DateTime<Utc>) -> u64 {
        self.next_run_at()
            .map(|at| (at - now).num_milliseconds().max(0) as u64)
            .unwrap_or(0)
    }

    fn arm(&self, at: DateTime<Utc>) {
        self.next_run_ms.store(at.timestamp_millis(), Ordering::Release);
    }

    /// Load the persisted run time and return how long to wait before ticking
    pub async fn resume(&self, now: DateTime<Utc>) -> std::time::Duration {
        let persisted = match self.schedule.load_next_run().await {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(%e, "Failed to load schedule state, rotating now");
                None
            }
        };

        if let Some(at) = persisted {
            self.arm(at);
        }

        let delay = startup_delay(persisted, now);
        tracing::info!(
            next_run_at = ?persisted,
            delay_ms = delay.as_millis() as u64,
            "Scheduler resumed"
        );
        delay
    }

    /// Run one rotation now. Safe to call manually.
    pub async fn tick(&self) -> TickOutcome {
        self.tick_at(Utc::now()).await
    }

    /// Run one rotation as of `now`
    ///
    /// Store failures are logged and turn into a fixed one-hour retry; this
    /// never returns an error.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> TickOutcome {
        let _guard = self.pool_lock.lock().await;

        match self.rotate(now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let next_run_at = now + RETRY_DELAY;
                tracing::error!(%e, %next_run_at, "Rotation failed, retrying later");

                if let Err(e) = self.schedule.persist_next_run(next_run_at).await {
                    tracing::error!(%e, "Failed to persist retry time");
                }
                self.arm(next_run_at);

                TickOutcome {
                    rotated_out: None,
                    promoted: None,
                    remaining: 0,
                    pool_empty: false,
                    next_run_at,
                    failed: true,
                }
            }
        }
    }

    async fn rotate(&self, now: DateTime<Utc>) -> Result<TickOutcome, StoreError> {
        let settings = self.settings.load_settings().await?;

        let rotated_out = match self.images.find_oldest_visible().await? {
            Some(current) => {
                self.images.set_visible(current.id, false).await?;
                tracing::info!(image_id = %current.id, name = %current.name, "Rotated out image");
                Some(current.id)
            }
            None => {
                tracing::debug!("No visible images to rotate out");
                None
            }
        };

        let mut remaining = self.images.count_visible().await?;
        let mut promoted = None;

        if remaining == 0 {
            match self.images.find_oldest_favorite().await? {
                Some(favorite) => {
                    self.images.set_visible(favorite.id, true).await?;
                    self.images.touch_queued_at(favorite.id, now).await?;
                    tracing::info!(image_id = %favorite.id, "Promoted favorite into empty pool");
                    promoted = Some(favorite.id);
                    remaining = 1;
                }
                None => {
                    tracing::warn!("Rotation pool is empty and there are no favorites");
                }
            }
        }

        let interval = compute_interval(
            settings.rotation_interval_hours,
            settings.default_image_duration_hours,
            remaining,
        );
        let next_run_at = now + interval;

        self.schedule.persist_next_run(next_run_at).await?;
        self.arm(next_run_at);

        tracing::info!(
            remaining,
            interval_minutes = interval.num_minutes(),
            %next_run_at,
            "Next rotation scheduled"
        );

        Ok(TickOutcome {
            rotated_out,
            promoted,
            remaining,
            pool_empty: remaining == 0,
            next_run_at,
            failed: false,
        })
    }

    /// Put an image back at the end of the queue: visible, queued now.
    ///
    /// Does not re-arm the timer.
    pub async fn requeue(&self, id: ImageId, now: DateTime<Utc>) -> Result<ImageRecord, StoreError> {
        let _guard = self.pool_lock.lock().await;
        self.images.set_visible(id, true).await?;
        let record = self.images.touch_queued_at(id, now).await?;
        tracing::info!(image_id = %id, "Requeued image");
        Ok(record)
    }

    pub async fn set_favorite(&self, id: ImageId, favorite: bool) -> Result<ImageRecord, StoreError> {
        let _guard = self.pool_lock.lock().await;
        let record = self.images.set_favorite(id, favorite).await?;
        tracing::info!(image_id = %id, favorite, "Updated favorite flag");
        Ok(record)
    }

    /// Store both artifacts and add the image to the pool as its newest entry
    pub async fn add_image(
        &self,
        image: NewImage,
        raster: Vec<u8>,
        bitmap: Vec<u8>,
    ) -> Result<ImageRecord, StoreError> {
        let _guard = self.pool_lock.lock().await;
        self.artifacts.put(&image.raster_key, raster).await?;
        self.artifacts.put(&image.rendered_key, bitmap).await?;
        self.images.insert(image).await
    }

    /// Remove an image and its artifacts.
    ///
    /// Identical uploads share one content-addressed bitmap; it is only
    /// removed once no record points at it.
    pub async fn delete(&self, id: ImageId) -> Result<ImageRecord, StoreError> {
        let _guard = self.pool_lock.lock().await;
        let record = self.images.delete(id).await?;
        self.artifacts.remove(&record.raster_key).await?;

        let shared = self
            .images
            .list()
            .await?
            .iter()
            .any(|other| other.rendered_key == record.rendered_key);
        if !shared {
            self.artifacts.remove(&record.rendered_key).await?;
        }

        tracing::info!(image_id = %id, shared_bitmap = shared, "Deleted image");
        Ok(record)
    }

    /// Drive the timer forever: resume from persisted state, then tick
    /// whenever the armed time is reached.
    pub async fn run(self: Arc<Self>) {
        let mut delay = self.resume(Utc::now()).await;
        loop {
            tokio::time::sleep(delay).await;
            let outcome = self.tick().await;
            delay = startup_delay(Some(outcome.next_run_at), Utc::now());
        }
    }

    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
