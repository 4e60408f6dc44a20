//! Posts and the write shapes issued to the post store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TagId, TagSummary, UserId};

/// Maximum number of characters allowed in a post title.
pub const POST_TITLE_MAX: usize = 200;

/// Validation errors raised while building post content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("post title must not be empty")]
    EmptyTitle,
    #[error("post title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("post id must be a valid UUID")]
    InvalidId,
}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Parse an identifier from its textual UUID form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| PostValidationError::InvalidId)
    }

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

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn validate_title(title: &str) -> Result<String, PostValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PostValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > POST_TITLE_MAX {
        return Err(PostValidationError::TitleTooLong {
            max: POST_TITLE_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Author-supplied post fields other than tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContent {
    title: String,
    body: String,
}

impl PostContent {
    /// Validate and construct post content.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::PostContent;
    ///
    /// let content = PostContent::new(" Hello ", "world").expect("valid");
    /// assert_eq!(content.title(), "Hello");
    /// ```
    pub fn new(
        title: impl AsRef<str>,
        body: impl Into<String>,
    ) -> Result<Self, PostValidationError> {
        Ok(Self {
            title: validate_title(title.as_ref())?,
            body: body.into(),
        })
    }

    /// Post title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Post body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Apply a partial update, returning the merged content.
    pub fn apply(&self, patch: &PostContentPatch) -> Self {
        Self {
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            body: patch.body.clone().unwrap_or_else(|| self.body.clone()),
        }
    }
}

/// Partial update of post fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostContentPatch {
    title: Option<String>,
    body: Option<String>,
}

impl PostContentPatch {
    /// Build a patch, validating the title when present.
    pub fn new(title: Option<String>, body: Option<String>) -> Result<Self, PostValidationError> {
        let title = title.as_deref().map(validate_title).transpose()?;
        Ok(Self { title, body })
    }

    /// Replacement title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replacement body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// `true` when the patch changes no field.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

/// Post as read back from the store, with its tags projected to `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned identifier.
    pub id: PostId,
    /// Author of the post.
    pub owner_id: UserId,
    /// Title and body.
    pub content: PostContent,
    /// Tags currently attached to the post.
    pub tags: Vec<TagSummary>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Identifiers of the attached tags.
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id).collect()
    }
}

/// Create-post mutation: the post and its tag connections in one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Author of the post.
    pub owner_id: UserId,
    /// Title and body.
    pub content: PostContent,
    /// Tags to connect while creating the post.
    pub tag_ids: Vec<TagId>,
}

/// Update-post mutation: field changes plus relation connect/disconnect lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    /// Field changes.
    pub content: PostContentPatch,
    /// Tags to connect.
    pub connect: Vec<TagId>,
    /// Tags to disconnect.
    pub disconnect: Vec<TagId>,
}
