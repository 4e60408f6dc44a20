//! Post HTTP handlers.
//!
//! ```text
//! POST   /api/v1/posts
//! GET    /api/v1/posts?tagIds=a,b
//! GET    /api/v1/posts/{id}
//! PATCH  /api/v1/posts/{id}
//! DELETE /api/v1/posts/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CreatePostRequest, DeletePostRequest, UpdatePostRequest, UserPermissionsError,
};
use crate::domain::{Error, Post, PostId, Requester, TagId, TagSummary, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    POST_ID, TAG_IDS, TAGS, missing_field_error, parse_post_content, parse_post_patch,
    parse_tag_names, parse_uuid, parse_uuid_csv,
};

/// Request payload for creating a post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    /// Post title.
    #[schema(example = "Moving to infra")]
    pub title: Option<String>,
    /// Post body; defaults to empty.
    pub body: Option<String>,
    /// Tag names to attach; missing means no tags.
    pub tags: Option<Vec<String>>,
}

/// Request payload for updating a post.
///
/// Omitting `tags` leaves the post's tags untouched, while an empty array
/// removes them all.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostBody {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement body.
    pub body: Option<String>,
    /// Complete desired tag list.
    pub tags: Option<Vec<String>>,
}

/// Tag reference embedded in a post.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagSummaryResponse {
    /// Tag identifier.
    pub id: String,
    /// Tag name.
    #[schema(example = "infra")]
    pub name: String,
}

impl From<TagSummary> for TagSummaryResponse {
    fn from(value: TagSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.into(),
        }
    }
}

/// Response payload for a post.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Author's user id.
    pub owner_id: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Attached tags, owned by the author.
    pub tags: Vec<TagSummaryResponse>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last write.
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            title: value.content.title().to_owned(),
            body: value.content.body().to_owned(),
            tags: value
                .tags
                .into_iter()
                .map(TagSummaryResponse::from)
                .collect(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Query string for listing posts by tag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsByTagsQuery {
    /// Comma-separated tag identifiers.
    pub tag_ids: Option<String>,
}

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    parse_uuid(raw, POST_ID).map(PostId::from_uuid)
}

fn parse_tag_ids(query: PostsByTagsQuery) -> Result<Vec<TagId>, Error> {
    let raw = query.tag_ids.ok_or_else(|| missing_field_error(TAG_IDS))?;
    Ok(parse_uuid_csv(&raw, TAG_IDS)?
        .into_iter()
        .map(TagId::from_uuid)
        .collect())
}

fn parse_create_body(
    owner_id: UserId,
    payload: CreatePostBody,
) -> Result<CreatePostRequest, Error> {
    Ok(CreatePostRequest {
        owner_id,
        content: parse_post_content(payload.title, payload.body)?,
        tag_names: parse_tag_names(payload.tags.unwrap_or_default(), TAGS)?,
    })
}

fn parse_update_body(
    post_id: PostId,
    requester_id: UserId,
    payload: UpdatePostBody,
) -> Result<UpdatePostRequest, Error> {
    Ok(UpdatePostRequest {
        post_id,
        requester_id,
        content: parse_post_patch(payload.title, payload.body)?,
        tag_names: payload
            .tags
            .map(|tags| parse_tag_names(tags, TAGS))
            .transpose()?,
    })
}

fn map_permissions_error(error: UserPermissionsError) -> Error {
    match error {
        UserPermissionsError::Connection { message } => Error::service_unavailable(message),
        UserPermissionsError::Query { message } => Error::internal(message),
    }
}

async fn resolve_requester(state: &HttpState, user_id: UserId) -> Result<Requester, Error> {
    let permissions = state
        .permissions
        .find_permissions(&user_id)
        .await
        .map_err(map_permissions_error)?;
    Ok(match permissions {
        Some(granted) => Requester::new(user_id, granted),
        None => Requester::anonymous_permissions(user_id),
    })
}

/// Create a post owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Created post", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    user: SessionUser,
    payload: web::Json<CreatePostBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = user.id();
    let request = parse_create_body(owner_id, payload.into_inner())?;
    let post = state.posts.create_post(request).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Update a post's content and reconcile its tags.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    request_body = UpdatePostBody,
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[patch("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    user: SessionUser,
    path: web::Path<String>,
    payload: web::Json<UpdatePostBody>,
) -> ApiResult<web::Json<PostResponse>> {
    let requester_id = user.id();
    let post_id = parse_post_id(&path.into_inner())?;
    let request = parse_update_body(post_id, requester_id, payload.into_inner())?;
    let post = state.posts.update_post(request).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Delete a post. Owners may delete their own posts; `ADMIN` and
/// `ITEMDELETE` may delete any post.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Deleted post", body = PostResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    user: SessionUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    let user_id = user.id();
    let post_id = parse_post_id(&path.into_inner())?;
    let requester = resolve_requester(&state, user_id).await?;
    let post = state
        .posts
        .delete_post(DeletePostRequest { post_id, requester })
        .await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Fetch a single post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    let post_id = parse_post_id(&path.into_inner())?;
    let post = state.posts_query.get_post(&post_id).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// List posts carrying any of the given tags.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(("tagIds" = String, Query, description = "Comma-separated tag identifiers")),
    responses(
        (status = 200, description = "Matching posts", body = [PostResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPostsByTags"
)]
#[get("/posts")]
pub async fn list_posts_by_tags(
    state: web::Data<HttpState>,
    query: web::Query<PostsByTagsQuery>,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let tag_ids = parse_tag_ids(query.into_inner())?;
    let posts = state.posts_query.posts_by_tags(&tag_ids).await?;
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
