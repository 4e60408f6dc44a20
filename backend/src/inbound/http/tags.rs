//! Tag HTTP handlers.
//!
//! ```text
//! GET /api/v1/tags
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Tag;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionUser;
use crate::inbound::http::state::HttpState;

/// Response payload for a tag owned by the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    /// Tag identifier.
    pub id: String,
    /// Tag name, unique per owner.
    pub name: String,
    /// Owning user's id.
    pub owner_id: String,
}

impl From<Tag> for TagResponse {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.into(),
            owner_id: value.owner_id.to_string(),
        }
    }
}

/// List the authenticated user's tags.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags owned by the caller", body = [TagResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: SessionUser,
) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let owner_id = user.id();
    let tags = state.posts_query.tags_for_owner(&owner_id).await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}
