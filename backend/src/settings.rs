//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BLOG_*` environment variables, or a
//! configuration file. Switches that must default on declare it on the field;
//! the remaining fields are optional and accessors supply defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CleanupRetryPolicy, PostServiceOptions};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Top-level configuration for the blog backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct AppSettings {
    /// Socket address for the HTTP listener.
    pub bind_addr: Option<SocketAddr>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies (`Strict`, `Lax` or `None`).
    pub session_same_site: Option<String>,
    /// Attempts per tag before orphan collection gives up.
    pub cleanup_max_attempts: Option<u32>,
    /// Delay before the first cleanup retry, in milliseconds.
    pub cleanup_initial_backoff_ms: Option<u64>,
    /// Upper bound on the cleanup retry delay, in milliseconds.
    pub cleanup_max_backoff_ms: Option<u64>,
    /// Link each tag to a newly created post after the post is written.
    #[ortho_config(default = true)]
    pub mirror_tag_links: bool,
}

impl AppSettings {
    /// Listener address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT))
    }

    /// Session key location, defaulting to the mounted secret path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Retry policy for the background cleanup worker.
    pub fn retry_policy(&self) -> CleanupRetryPolicy {
        let defaults = CleanupRetryPolicy::default();
        CleanupRetryPolicy {
            max_attempts: self.cleanup_max_attempts.unwrap_or(defaults.max_attempts),
            initial_backoff: self
                .cleanup_initial_backoff_ms
                .map_or(defaults.initial_backoff, Duration::from_millis),
            max_backoff: self
                .cleanup_max_backoff_ms
                .map_or(defaults.max_backoff, Duration::from_millis),
        }
    }

    /// Options for the post service.
    pub fn post_service_options(&self) -> PostServiceOptions {
        PostServiceOptions {
            mirror_tag_links: self.mirror_tag_links,
        }
    }
}
