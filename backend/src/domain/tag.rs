//! User-scoped tags attached to posts.
//!
//! A tag belongs to exactly one user and is unique by name among that user's
//! tags. Uniqueness is upheld by the tag provisioner rather than by the
//! entity itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PostId, UserId};

/// Maximum number of characters allowed in a tag name.
pub const TAG_NAME_MAX: usize = 64;

/// Validation errors returned by [`TagName::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagValidationError {
    /// The name is empty after trimming.
    #[error("tag name must not be empty")]
    EmptyName,
    /// The name exceeds [`TAG_NAME_MAX`] characters.
    #[error("tag name must be at most {max} characters")]
    NameTooLong {
        /// Limit that was exceeded.
        max: usize,
    },
}

/// Stable tag identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(Uuid);

impl TagId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-entered tag label, trimmed of surrounding whitespace.
///
/// Comparison is exact after trimming: `Rust` and `rust` are distinct tags.
///
/// # Examples
/// ```
/// use blog_backend::domain::TagName;
///
/// let name = TagName::new("  infra ").expect("valid name");
/// assert_eq!(name.as_ref(), "infra");
/// assert!(TagName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Validate and construct a tag name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        if trimmed.chars().count() > TAG_NAME_MAX {
            return Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

impl TryFrom<String> for TagName {
    type Error = TagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted tag record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Store-assigned identifier.
    pub id: TagId,
    /// Label unique among the owner's tags.
    pub name: TagName,
    /// User who owns the tag.
    pub owner_id: UserId,
}

impl Tag {
    /// Project the tag into the summary embedded in posts.
    pub fn summary(&self) -> TagSummary {
        TagSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Data required to create a tag. New tags start with no posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Label for the new tag.
    pub name: TagName,
    /// Owner of the new tag.
    pub owner_id: UserId,
}

/// The `{id, name}` projection of a tag attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    /// Tag identifier.
    pub id: TagId,
    /// Tag label.
    pub name: TagName,
}

/// A tag together with the identifiers of every post referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    /// The tag record.
    pub tag: Tag,
    /// Posts currently connected to the tag.
    pub post_ids: Vec<PostId>,
}

impl TagUsage {
    /// Number of posts referencing the tag.
    pub fn post_count(&self) -> usize {
        self.post_ids.len()
    }

    /// A tag no post references is garbage.
    pub fn is_orphaned(&self) -> bool {
        self.post_ids.is_empty()
    }
}
