//! Viewer settings persistence.

use crate::model::settings::Settings;
use crate::repo::StoreResult;
use crate::storage::KeyValueStorage;
use log::{info, warn};

pub const SETTINGS_KEY: &str = "glowtree.settings.v1";

/// Settings blob over an injected storage backend.
pub struct SettingsStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads settings, falling back to defaults on any read or parse error.
    pub fn load(&self) -> Settings {
        let blob = match self.storage.get(SETTINGS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Settings::default(),
            Err(err) => {
                warn!("event=settings_load module=store status=degraded reason=read_failed error={err}");
                return Settings::default();
            }
        };

        serde_json::from_str(&blob).unwrap_or_else(|err| {
            warn!("event=settings_load module=store status=degraded reason=corrupt_blob error={err}");
            Settings::default()
        })
    }

    pub fn save(&self, settings: &Settings) -> StoreResult<()> {
        let blob = serde_json::to_string(settings)?;
        self.storage.set(SETTINGS_KEY, &blob)?;
        info!(
            "event=settings_save module=store status=ok auto_cycle={}",
            settings.auto_cycle
        );
        Ok(())
    }
}
