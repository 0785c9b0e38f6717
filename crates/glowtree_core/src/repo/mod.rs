//! Stores layered over injected key/value storage.
//!
//! # Responsibility
//! - Own the two persisted blobs (messages, settings) and their formats.
//! - Degrade unreadable persisted state to empty/default values on reads.
//! - Refuse writes that would replace an unreadable message blob.
//!
//! # Invariants
//! - Only these stores parse or write their keys.
//! - The message blob is append-only apart from `clear`; no write drops a
//!   stored record.

use crate::model::message::{MessageId, MessageValidationError};
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod message_store;
pub mod settings_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path failures. Read paths never return these.
#[derive(Debug)]
pub enum StoreError {
    Validation(MessageValidationError),
    DuplicateId(MessageId),
    Storage(StorageError),
    Serialization(serde_json::Error),
    /// Existing blob failed to parse; appending would overwrite it.
    CorruptBlob(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "message already stored: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to serialize store: {err}"),
            Self::CorruptBlob(err) => {
                write!(f, "stored messages are unreadable; refusing to overwrite: {err}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
            Self::Storage(err) => Some(err),
            Self::Serialization(err) | Self::CorruptBlob(err) => Some(err),
        }
    }
}

impl From<MessageValidationError> for StoreError {
    fn from(value: MessageValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
