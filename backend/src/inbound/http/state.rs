//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixturePostCommand, FixturePostQuery, FixtureUserPermissionsRepository, PostCommand,
    PostQuery, UserPermissionsRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Post mutations.
    pub posts: Arc<dyn PostCommand>,
    /// Post and tag reads.
    pub posts_query: Arc<dyn PostQuery>,
    /// Permission lookup for the authenticated caller.
    pub permissions: Arc<dyn UserPermissionsRepository>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use blog_backend::domain::ports::{
    ///     FixturePostCommand, FixturePostQuery, FixtureUserPermissionsRepository,
    /// };
    /// use blog_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixturePostCommand),
    ///     Arc::new(FixturePostQuery),
    ///     Arc::new(FixtureUserPermissionsRepository),
    /// );
    /// let _posts = state.posts.clone();
    /// ```
    pub fn new(
        posts: Arc<dyn PostCommand>,
        posts_query: Arc<dyn PostQuery>,
        permissions: Arc<dyn UserPermissionsRepository>,
    ) -> Self {
        Self {
            posts,
            posts_query,
            permissions,
        }
    }

    /// State backed entirely by fixture ports.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixturePostCommand),
            Arc::new(FixturePostQuery),
            Arc::new(FixtureUserPermissionsRepository),
        )
    }
}
