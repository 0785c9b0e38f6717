//! Append-only message collection.
//!
//! # Responsibility
//! - Persist messages as one JSON array under `MESSAGES_KEY`.
//! - Answer id, year and count queries in insertion order.
//!
//! # Invariants
//! - Ids are unique; insertion order is the only ordering.
//! - A failed append leaves the persisted blob untouched.
//! - Unreadable blobs read as an empty store on queries; `append` refuses
//!   to replace them.

use crate::model::message::Message;
use crate::repo::{StoreError, StoreResult};
use crate::storage::KeyValueStorage;
use chrono::Datelike;
use log::{error, info, warn};

pub const MESSAGES_KEY: &str = "glowtree.messages.v1";

/// Message store over an injected storage backend.
pub struct MessageStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> MessageStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Appends one message.
    ///
    /// # Errors
    /// - `Validation` when the message violates field constraints.
    /// - `DuplicateId` when a message with the same id is stored.
    /// - `CorruptBlob`/`Storage` when the stored blob cannot be read back.
    /// - `Serialization`/`Storage` when the write is rejected.
    pub fn append(&self, message: &Message) -> StoreResult<()> {
        message.validate()?;

        let mut messages = self.load_for_write()?;
        if messages.iter().any(|stored| stored.id() == message.id()) {
            return Err(StoreError::DuplicateId(message.id().to_string()));
        }
        messages.push(message.clone());

        let blob = serde_json::to_string(&messages).map_err(|err| {
            error!("event=message_append module=store status=error error_code=serialize_failed error={err}");
            StoreError::from(err)
        })?;
        if let Err(err) = self.storage.set(MESSAGES_KEY, &blob) {
            error!(
                "event=message_append module=store status=error error_code=write_failed bytes={} error={}",
                blob.len(),
                err
            );
            return Err(err.into());
        }

        info!(
            "event=message_append module=store status=ok count={} category={}",
            messages.len(),
            message.category().as_str()
        );
        Ok(())
    }

    /// Returns every message in insertion order.
    pub fn all(&self) -> Vec<Message> {
        let blob = match self.storage.get(MESSAGES_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("event=message_load module=store status=degraded reason=read_failed error={err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Message>>(&blob) {
            Ok(messages) => messages,
            Err(err) => {
                warn!(
                    "event=message_load module=store status=degraded reason=corrupt_blob bytes={} error={}",
                    blob.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Strict load used before a write: only a missing key reads as empty.
    fn load_for_write(&self) -> StoreResult<Vec<Message>> {
        let blob = match self.storage.get(MESSAGES_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(Vec::new()),
            Err(err) => {
                error!("event=message_append module=store status=error error_code=read_failed error={err}");
                return Err(err.into());
            }
        };

        serde_json::from_str::<Vec<Message>>(&blob).map_err(|err| {
            error!(
                "event=message_append module=store status=error error_code=corrupt_blob bytes={} error={}",
                blob.len(),
                err
            );
            StoreError::CorruptBlob(err)
        })
    }

    pub fn by_id(&self, id: &str) -> Option<Message> {
        self.all().into_iter().find(|message| message.id() == id)
    }

    /// Messages created in calendar year `year` (UTC).
    pub fn by_year(&self, year: i32) -> Vec<Message> {
        self.all()
            .into_iter()
            .filter(|message| message.created_at().year() == year)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.all().len()
    }

    /// Irreversibly removes every stored message.
    pub fn clear(&self) -> StoreResult<()> {
        self.storage.remove(MESSAGES_KEY)?;
        warn!("event=message_clear module=store status=ok");
        Ok(())
    }
}
