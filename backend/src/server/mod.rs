//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use blog_backend::ApiDoc;
use blog_backend::domain::PostService;
use blog_backend::inbound::http::health::{HealthState, live, ready};
use blog_backend::inbound::http::posts::{
    create_post, delete_post, get_post, list_posts_by_tags, update_post,
};
use blog_backend::inbound::http::state::HttpState;
use blog_backend::inbound::http::tags::list_tags;
use blog_backend::outbound::persistence::InMemoryStore;
use blog_backend::outbound::queue::ChannelTagCleanupQueue;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(create_post)
        .service(list_posts_by_tags)
        .service(get_post)
        .service(update_post)
        .service(delete_post)
        .service(list_tags);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Wire the post service to the store and cleanup queue.
fn build_http_state(
    store: Arc<InMemoryStore>,
    cleanup: Arc<ChannelTagCleanupQueue>,
    config: &ServerConfig,
) -> HttpState {
    let service = Arc::new(PostService::with_options(
        Arc::clone(&store),
        Arc::clone(&store),
        cleanup,
        config.post_options,
    ));
    HttpState::new(service.clone(), service, store)
}

/// Construct an Actix HTTP server backed by `store`, sending orphan tag
/// candidates to `cleanup`.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    store: Arc<InMemoryStore>,
    cleanup: Arc<ChannelTagCleanupQueue>,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(store, cleanup, &config));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        post_options: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
