//! Core domain logic for glowtree.
//! This crate is the single source of truth for placement, storage and
//! node lifecycle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod placement;
pub mod repo;
pub mod scene;
pub mod service;
pub mod storage;
pub mod tier;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::message::{Message, MessageId, MessageValidationError, Placement, TreePart};
pub use model::settings::{Settings, Weather};
pub use model::vec3::Vec3;
pub use placement::{place, placement_seed, seed_hash};
pub use repo::message_store::MessageStore;
pub use repo::settings_store::SettingsStore;
pub use repo::{StoreError, StoreResult};
pub use scene::backend::{HeadlessScene, RenderHandle, SceneBackend, Transform};
pub use scene::camera::{Camera, FlyTo, PointerPosition, Viewport};
pub use scene::nodes::{HoverEvent, NodeManager};
pub use service::tree_service::{ServiceError, ServiceResult, TreeService};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
pub use tier::{calculate_tier, progress, Tier, TierProgress};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
