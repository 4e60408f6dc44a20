//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use blog_backend::domain::PostServiceOptions;
use blog_backend::inbound::http::session_config::SessionSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) post_options: PostServiceOptions,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            post_options: PostServiceOptions::default(),
        }
    }

    /// Override the post service tunables.
    #[must_use]
    pub fn with_post_options(mut self, options: PostServiceOptions) -> Self {
        self.post_options = options;
        self
    }
}
