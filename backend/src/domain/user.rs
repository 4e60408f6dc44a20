//! User identity and permission primitives.
//!
//! Users are owned by the authentication collaborator. This crate only sees a
//! user as a foreign key on posts and tags plus the permission set used when a
//! requester acts on content they do not own.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing user identity input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("unknown permission: {value}")]
    UnknownPermission { value: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Permission strings granted to a user by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    /// Full administrative access.
    Admin,
    /// Baseline permission granted on signup.
    User,
    /// May delete content owned by other users.
    ItemDelete,
    /// May change other users' permissions.
    PermissionUpdate,
}

impl Permission {
    /// Wire representation used by the authentication collaborator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::ItemDelete => "ITEMDELETE",
            Self::PermissionUpdate => "PERMISSIONUPDATE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "ITEMDELETE" => Ok(Self::ItemDelete),
            "PERMISSIONUPDATE" => Ok(Self::PermissionUpdate),
            other => Err(UserValidationError::UnknownPermission {
                value: other.to_owned(),
            }),
        }
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for Permission {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Authenticated caller acting on posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    /// Identity resolved from the session.
    pub id: UserId,
    /// Permissions held by the caller.
    pub permissions: BTreeSet<Permission>,
}

impl Requester {
    /// Build a requester from an identity and its permissions.
    pub fn new(id: UserId, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            id,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Requester known only by identity, holding no permissions.
    pub fn anonymous_permissions(id: UserId) -> Self {
        Self::new(id, [])
    }
}
