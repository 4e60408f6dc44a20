//! Caller identity taken from the cookie session.
//!
//! Sign-in happens outside this service: the login flow stores the user's id
//! under [`USER_ID_KEY`]. Handlers here never write the session; they take a
//! [`SessionUser`] argument and get `401 Unauthorized` when nobody is signed in.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId};

/// Session key holding the signed-in user's id.
pub(crate) const USER_ID_KEY: &str = "user_id";

/// The signed-in caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(UserId);

impl SessionUser {
    /// Identifier of the signed-in user.
    pub fn id(&self) -> UserId {
        self.0
    }

    fn from_session(session: &Session) -> Result<Self, Error> {
        let raw = session
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        UserId::new(&raw).map(Self).map_err(|error| {
            warn!(%error, "discarding malformed user id from session cookie");
            Error::unauthorized("login required")
        })
    }
}

impl FromRequest for SessionUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_session(&req.get_session()))
    }
}
