//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the post, tag and health endpoints, the error schema
//! wrappers from [`crate::inbound::http::schemas`], and the session cookie
//! security scheme. Swagger UI serves it in debug builds.

use crate::inbound::http::posts::{
    CreatePostBody, PostResponse, TagSummaryResponse, UpdatePostBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tags::TagResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the external login flow.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "Posts with per-user tags, reconciled on every write."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::list_posts_by_tags,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreatePostBody,
        UpdatePostBody,
        PostResponse,
        TagSummaryResponse,
        TagResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "posts", description = "Post lifecycle and tag reconciliation"),
        (name = "tags", description = "Tags owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
