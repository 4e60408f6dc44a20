//! Port exposing the authentication collaborator's view of user permissions.
use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Permission, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving user permissions.
    pub enum UserPermissionsError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Lookup of the permission strings granted to a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserPermissionsRepository: Send + Sync {
    /// Permissions for `user_id`, or `None` if the directory does not know the
    /// user.
    async fn find_permissions(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BTreeSet<Permission>>, UserPermissionsError>;
}

/// Fixture directory that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserPermissionsRepository;

#[async_trait]
impl UserPermissionsRepository for FixtureUserPermissionsRepository {
    async fn find_permissions(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<BTreeSet<Permission>>, UserPermissionsError> {
        Ok(None)
    }
}
