//! Permission checks applied before any post mutation is written.

use serde_json::json;

use crate::domain::{Error, Permission, Requester, UserId};

/// Permissions that allow deleting a post owned by someone else.
pub const POST_DELETE_PERMISSIONS: [Permission; 2] = [Permission::Admin, Permission::ItemDelete];

/// Require the requester to hold at least one of `needed`.
///
/// # Examples
/// ```
/// use blog_backend::domain::{Permission, Requester, UserId, require_any_permission};
///
/// let admin = Requester::new(UserId::random(), [Permission::Admin]);
/// assert!(require_any_permission(&admin, &[Permission::Admin, Permission::ItemDelete]).is_ok());
///
/// let user = Requester::new(UserId::random(), [Permission::User]);
/// assert!(require_any_permission(&user, &[Permission::Admin]).is_err());
/// ```
pub fn require_any_permission(requester: &Requester, needed: &[Permission]) -> Result<(), Error> {
    if needed
        .iter()
        .any(|permission| requester.permissions.contains(permission))
    {
        return Ok(());
    }

    let needed: Vec<&str> = needed.iter().map(|permission| permission.as_str()).collect();
    let held: Vec<&str> = requester
        .permissions
        .iter()
        .map(|permission| permission.as_str())
        .collect();
    Err(Error::forbidden("insufficient permissions").with_details(json!({
        "required": needed,
        "held": held,
        "code": "insufficient_permissions",
    })))
}

/// Require the requester to own the post or hold a delete permission.
pub fn authorize_post_deletion(requester: &Requester, owner_id: &UserId) -> Result<(), Error> {
    if &requester.id == owner_id {
        return Ok(());
    }
    require_any_permission(requester, &POST_DELETE_PERMISSIONS)
        .map_err(|_| Error::forbidden("you do not have permission to delete this post"))
}

/// Require the requester to own the post being edited.
pub fn authorize_post_update(requester_id: &UserId, owner_id: &UserId) -> Result<(), Error> {
    if requester_id == owner_id {
        Ok(())
    } else {
        Err(Error::forbidden("only the post owner may edit this post"))
    }
}
