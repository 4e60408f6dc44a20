//! Test helpers for inbound HTTP components.

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::session::USER_ID_KEY;

/// Path of the test-only route that signs a user in.
pub const TEST_LOGIN_PATH: &str = "/test-login/{user_id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stand-in for the external login flow: stores the path's user id in the
/// session.
pub async fn test_login(session: Session, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session
        .insert(USER_ID_KEY, user_id.to_string())
        .map_err(|err| Error::internal(format!("failed to write test session: {err}")))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sign `user_id` in through [`test_login`] and return the session cookie.
pub async fn login_cookie<S>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri(&format!("/test-login/{user_id}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "test login succeeds");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
