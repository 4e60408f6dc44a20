//! Session cookie configuration derived from [`AppSettings`].
//!
//! Release builds refuse to start without a readable signing key of at least
//! [`SESSION_KEY_MIN_LEN`] bytes. Debug builds fall back to a generated key.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

/// Minimum key file length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require a real key and a coherent cookie policy.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The configured `SameSite` value is not recognised.
    #[error("invalid session SameSite value '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    /// `SameSite=None` requires secure cookies in release builds.
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from application configuration.
///
/// # Errors
/// Returns [`SessionConfigError`] when the configuration is unusable for the
/// given build mode.
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if settings.session_allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let cookie_secure = settings.cookie_secure();
    let same_site = same_site(settings.session_same_site.as_deref(), mode, cookie_secure)?;
    let key = session_key(
        settings.session_key_file(),
        mode,
        settings.session_allow_ephemeral,
    )?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = value else {
        return Ok(default_same_site);
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without secure cookies; browsers may reject the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value, "invalid session SameSite value, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}
