//! Message domain model.
//!
//! # Responsibility
//! - Define the immutable record rendered as an ornament on the tree.
//! - Normalize and validate submission input before it reaches storage.
//! - Accept stored records that only meet the non-empty rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another message.
//! - `category` and `placement` are always `place(author, id)`; they are
//!   re-derived on deserialization instead of trusted from storage.
//! - `author` and `text` are non-empty after normalization.

use crate::model::vec3::Vec3;
use crate::placement::place;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable message identifier, as typed into the search box.
pub type MessageId = String;

pub const MAX_AUTHOR_CHARS: usize = 32;
pub const MAX_TEXT_CHARS: usize = 200;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Part of the tree a message is inscribed on.
///
/// Declaration order is load-bearing: `ALL` is indexed by `seed % 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreePart {
    /// Cylinder band around the trunk.
    Trunk,
    /// Band along one of the branch curves.
    Branch,
    /// Spherical shell around the crown.
    Canopy,
    /// Flared band near the ground.
    Root,
}

impl TreePart {
    pub const ALL: [TreePart; 4] = [
        TreePart::Trunk,
        TreePart::Branch,
        TreePart::Canopy,
        TreePart::Root,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trunk => "trunk",
            Self::Branch => "branch",
            Self::Canopy => "canopy",
            Self::Root => "root",
        }
    }
}

/// Derived visual placement of a message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub category: TreePart,
    pub position: Vec3,
    /// Glow strength in `[0.5, 1.0]`.
    pub intensity: f64,
}

/// Validation failures surfaced to the submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValidationError {
    /// Id is empty after trimming.
    EmptyId,
    /// Author is empty after normalization.
    EmptyAuthor,
    /// Text is empty after trimming.
    EmptyText,
    /// Author exceeds the submission limit. Only checked for new messages.
    AuthorTooLong { max: usize, actual: usize },
    /// Text exceeds the submission limit. Only checked for new messages.
    TextTooLong { max: usize, actual: usize },
}

impl Display for MessageValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "message id cannot be empty"),
            Self::EmptyAuthor => write!(f, "author cannot be empty"),
            Self::EmptyText => write!(f, "message text cannot be empty"),
            Self::AuthorTooLong { max, actual } => {
                write!(f, "author is {actual} characters; at most {max} allowed")
            }
            Self::TextTooLong { max, actual } => {
                write!(f, "message text is {actual} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for MessageValidationError {}

/// Canonical message record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MessageRecord")]
pub struct Message {
    id: MessageId,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
    category: TreePart,
    placement: Placement,
}

/// Wire shape accepted from storage. Derived fields are ignored.
#[derive(Deserialize)]
struct MessageRecord {
    id: MessageId,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = MessageValidationError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        Message::with_id(value.id, value.author, value.text, value.created_at)
    }
}

impl Message {
    /// Creates a message with a generated id and the current timestamp.
    ///
    /// This is the submission path, so the author/text length limits apply.
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, MessageValidationError> {
        let message = Self::with_id(Uuid::new_v4().to_string(), author, text, Utc::now())?;
        message.check_submission_limits()?;
        Ok(message)
    }

    /// Creates a message with a caller-provided id and timestamp.
    ///
    /// Used by import paths, storage reads and tests where identity already
    /// exists. Only the non-empty checks apply; records stored under older
    /// or looser limits must stay loadable.
    pub fn with_id(
        id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, MessageValidationError> {
        let id = id.into().trim().to_string();
        let author = normalize_author(&author.into());
        let text = text.into().trim().to_string();
        validate_identity(&id, &author, &text)?;

        let placement = place(&author, &id);
        Ok(Self {
            id,
            author,
            text,
            created_at,
            category: placement.category,
            placement,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn category(&self) -> TreePart {
        self.category
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Re-checks the non-empty constraints every stored message must meet.
    pub fn validate(&self) -> Result<(), MessageValidationError> {
        validate_identity(&self.id, &self.author, &self.text)
    }

    /// Checks the author/text length limits of the submission form.
    pub fn check_submission_limits(&self) -> Result<(), MessageValidationError> {
        let author_chars = self.author.chars().count();
        if author_chars > MAX_AUTHOR_CHARS {
            return Err(MessageValidationError::AuthorTooLong {
                max: MAX_AUTHOR_CHARS,
                actual: author_chars,
            });
        }
        let text_chars = self.text.chars().count();
        if text_chars > MAX_TEXT_CHARS {
            return Err(MessageValidationError::TextTooLong {
                max: MAX_TEXT_CHARS,
                actual: text_chars,
            });
        }
        Ok(())
    }

    /// Returns whether stored placement matches a fresh derivation.
    pub fn placement_is_consistent(&self) -> bool {
        let fresh = place(&self.author, &self.id);
        fresh == self.placement && fresh.category == self.category
    }
}

/// Trims and collapses internal whitespace runs to one space.
pub fn normalize_author(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

fn validate_identity(id: &str, author: &str, text: &str) -> Result<(), MessageValidationError> {
    if id.is_empty() {
        return Err(MessageValidationError::EmptyId);
    }
    if author.is_empty() {
        return Err(MessageValidationError::EmptyAuthor);
    }
    if text.is_empty() {
        return Err(MessageValidationError::EmptyText);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_author, Message, MessageValidationError};

    #[test]
    fn normalize_author_collapses_whitespace() {
        assert_eq!(normalize_author("  Ada \t  Lovelace \n"), "Ada Lovelace");
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let err = Message::new("Ada", "   ").unwrap_err();
        assert_eq!(err, MessageValidationError::EmptyText);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Message::new("Ada", "one").unwrap();
        let b = Message::new("Ada", "one").unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.placement_is_consistent());
    }

    #[test]
    fn length_limits_apply_only_to_new_messages() {
        let long_text = "x".repeat(super::MAX_TEXT_CHARS + 1);
        let err = Message::new("Ada", long_text.clone()).unwrap_err();
        assert!(matches!(err, MessageValidationError::TextTooLong { .. }));

        let imported = Message::with_id("m1", "Ada", long_text, chrono::Utc::now()).unwrap();
        assert!(imported.validate().is_ok());
        assert!(imported.check_submission_limits().is_err());
    }
}
