use rocket::{
    http::{Cookie, SameSite, Status},
    request::{self, FromRequest},
    Request,
};

use crate::error::Error;
use crate::model::{AdminSession, Session, SessionToken, Store};

pub const SESSION_COOKIE: &str = "session_token";
pub const ADMIN_COOKIE: &str = "admin_token";

/// The error a request guard rejected a request with, stashed so the
/// catcher can report it.
pub struct Rejection(pub Option<Error>);

fn reject<S>(req: &Request<'_>, err: Error) -> request::Outcome<S, Error> {
    let status = err.status();
    req.local_cache(|| Rejection(Some(err.clone())));
    request::Outcome::Error((status, err))
}

/// Read a token from an `Authorization: Bearer` header, falling back to a cookie.
fn token_from(req: &Request<'_>, cookie: &str) -> Option<SessionToken> {
    req.headers()
        .get_one("Authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| SessionToken::from(token.trim()))
        .or_else(|| req.cookies().get(cookie).map(|c| SessionToken::from(c.value())))
}

/// Build the cookie carrying a session token.
pub fn token_cookie(name: &'static str, token: &SessionToken) -> Cookie<'static> {
    Cookie::build((name, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// A voter session, resumed from the token the client presents.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for Session {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(token) = token_from(req, SESSION_COOKIE) else {
            return reject(req, Error::auth("Please login first"));
        };
        let Some(store) = req.rocket().state::<Store>() else {
            return request::Outcome::Forward(Status::InternalServerError);
        };
        match store.voters().resume(&token) {
            Ok(session) => request::Outcome::Success(session),
            Err(err) => reject(req, err),
        }
    }
}

/// An admin session token. Its validity is checked by whichever operation
/// it is presented to.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match token_from(req, ADMIN_COOKIE) {
            Some(token) => request::Outcome::Success(AdminSession::from(token)),
            None => reject(req, Error::auth("Admin access required")),
        }
    }
}
