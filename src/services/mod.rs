pub mod artifact_store;
pub mod image_store;
pub mod renderer;
pub mod schedule_store;
pub mod scheduler;
pub mod settings_store;

pub use artifact_store::{ArtifactStore, InMemoryArtifactStore};
pub use image_store::{ImageStore, InMemoryImageStore};
pub use renderer::RenderService;
pub use schedule_store::{FileScheduleStore, InMemoryScheduleStore, ScheduleStore};
pub use scheduler::{RotationScheduler, TickOutcome};
pub use settings_store::{InMemorySettingsStore, SettingsStore};
