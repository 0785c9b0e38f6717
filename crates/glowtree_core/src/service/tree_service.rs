//! Tree use-case service.
//!
//! # Responsibility
//! - Route inbound events (submit, search, pointer, frame tick) to the
//!   stores and the node manager.
//! - Persist viewer settings and run the weather auto-cycle.
//!
//! # Invariants
//! - Validation failures never reach the store.
//! - A node is created only after its message was persisted.
//! - At most one camera fly-to runs at a time.

use crate::model::message::{Message, MessageValidationError};
use crate::model::settings::{Settings, Weather};
use crate::model::vec3::Vec3;
use crate::repo::message_store::MessageStore;
use crate::repo::settings_store::SettingsStore;
use crate::repo::StoreError;
use crate::scene::backend::SceneBackend;
use crate::scene::camera::{Camera, FlyTo, PointerPosition};
use crate::scene::nodes::{HoverEvent, NodeManager};
use crate::storage::KeyValueStorage;
use crate::tier::{calculate_tier, progress, Tier, TierProgress};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Seconds between weather changes while auto-cycle is on.
pub const WEATHER_CYCLE_SECONDS: f64 = 20.0;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for tree use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Submission input rejected before persistence.
    Validation(MessageValidationError),
    /// Persistence rejected the write.
    Store(StoreError),
    /// No message with this id.
    NotFound(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "message not found: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<MessageValidationError> for ServiceError {
    fn from(value: MessageValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Orchestrates storage, nodes and camera for one viewer session.
pub struct TreeService<'s, S: KeyValueStorage, B: SceneBackend> {
    messages: MessageStore<&'s S>,
    settings_store: SettingsStore<&'s S>,
    settings: Settings,
    nodes: NodeManager<B>,
    camera: Camera,
    fly_to: FlyTo,
    cycle_elapsed: f64,
}

impl<'s, S: KeyValueStorage, B: SceneBackend> TreeService<'s, S, B> {
    /// Creates a session over `storage`, loading persisted settings.
    pub fn new(storage: &'s S, backend: B, camera: Camera) -> Self {
        let settings_store = SettingsStore::new(storage);
        let settings = settings_store.load();
        Self {
            messages: MessageStore::new(storage),
            settings_store,
            settings,
            nodes: NodeManager::new(backend),
            camera,
            fly_to: FlyTo::new(),
            cycle_elapsed: 0.0,
        }
    }

    /// Creates nodes for every stored message. Returns how many were created.
    pub fn load(&mut self) -> usize {
        let created = self
            .messages
            .all()
            .iter()
            .filter(|message| self.nodes.create(message))
            .count();
        info!("event=tree_load module=service status=ok nodes={created}");
        created
    }

    /// Validates, persists and displays a new message.
    pub fn submit(&mut self, author: &str, text: &str) -> ServiceResult<Message> {
        let message = Message::new(author, text).map_err(|err| {
            warn!("event=message_submit module=service status=rejected reason={err}");
            ServiceError::from(err)
        })?;
        self.submit_message(message)
    }

    /// Persists and displays an already built message.
    pub fn submit_message(&mut self, message: Message) -> ServiceResult<Message> {
        self.messages.append(&message)?;
        self.nodes.create(&message);
        info!(
            "event=message_submit module=service status=ok category={}",
            message.category().as_str()
        );
        Ok(message)
    }

    /// Highlights the node for `id` and flies the camera toward it.
    ///
    /// The fly-to is skipped while another one is in progress; the pulse
    /// and returned position are unaffected.
    pub fn search(&mut self, id: &str) -> ServiceResult<Vec3> {
        let id = id.trim();
        if !self.nodes.contains(id) {
            let Some(message) = self.messages.by_id(id) else {
                info!("event=message_search module=service status=not_found");
                return Err(ServiceError::NotFound(id.to_string()));
            };
            self.nodes.create(&message);
        }

        let position = self
            .nodes
            .highlight(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        let flying = self.fly_to.start(&self.camera, position);
        info!("event=message_search module=service status=ok fly_to_started={flying}");
        Ok(position)
    }

    pub fn pointer_move(&mut self, pointer: PointerPosition) -> Option<Message> {
        self.nodes.hover(pointer, &self.camera).cloned()
    }

    pub fn pointer_click(&mut self, pointer: PointerPosition) -> Option<Message> {
        self.nodes.click(pointer, &self.camera)
    }

    pub fn on_click(&mut self, callback: impl FnMut(&Message) + 'static) {
        self.nodes.on_click(callback);
    }

    pub fn on_hover(&mut self, callback: impl FnMut(&HoverEvent) + 'static) {
        self.nodes.on_hover(callback);
    }

    /// Per-frame tick.
    pub fn update(&mut self, dt: f64) {
        self.nodes.update(dt);
        self.fly_to.update(dt, &mut self.camera);

        if !self.settings.auto_cycle {
            return;
        }
        self.cycle_elapsed += dt.max(0.0);
        let mut changed = false;
        while self.cycle_elapsed >= WEATHER_CYCLE_SECONDS {
            self.cycle_elapsed -= WEATHER_CYCLE_SECONDS;
            self.settings.weather = self.settings.weather.next();
            changed = true;
        }
        if changed {
            self.persist_settings();
        }
    }

    pub fn set_weather(&mut self, weather: Weather) -> ServiceResult<()> {
        self.settings.weather = weather;
        self.settings_store.save(&self.settings)?;
        Ok(())
    }

    pub fn set_auto_cycle(&mut self, enabled: bool) -> ServiceResult<()> {
        self.settings.auto_cycle = enabled;
        self.cycle_elapsed = 0.0;
        self.settings_store.save(&self.settings)?;
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_flying(&self) -> bool {
        self.fly_to.is_active()
    }

    pub fn nodes(&self) -> &NodeManager<B> {
        &self.nodes
    }

    pub fn messages(&self) -> &MessageStore<&'s S> {
        &self.messages
    }

    /// Tier reached by messages created in `year`.
    pub fn tier_for_year(&self, year: i32) -> Tier {
        calculate_tier(self.messages.by_year(year).len() as u64)
    }

    pub fn progress_for_year(&self, year: i32) -> TierProgress {
        progress(self.messages.by_year(year).len() as u64)
    }

    /// Tier reached by all stored messages.
    pub fn total_tier(&self) -> Tier {
        calculate_tier(self.messages.count() as u64)
    }

    fn persist_settings(&self) {
        if let Err(err) = self.settings_store.save(&self.settings) {
            error!("event=settings_save module=service status=error error={err}");
        }
    }
}
