use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::error::{Error, ErrorBody};

use self::token::Rejection;

mod admin;
mod auth;
mod public;
mod token;
mod voter;
mod voting;

pub use token::{ADMIN_COOKIE, SESSION_COOKIE};

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(auth::routes());
    routes.extend(public::routes());
    routes.extend(voter::routes());
    routes.extend(voting::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![malformed, unprocessable, fallback]
}

#[catch(400)]
fn malformed() -> Json<ErrorBody> {
    Json(ErrorBody::from(&Error::validation("Malformed request")))
}

#[catch(422)]
fn unprocessable() -> Json<ErrorBody> {
    Json(ErrorBody::from(&Error::validation("Missing or malformed fields")))
}

/// Reports guard rejections with their original error, and anything else
/// by status alone.
#[catch(default)]
fn fallback(status: Status, req: &Request<'_>) -> Json<ErrorBody> {
    if let Rejection(Some(err)) = req.local_cache(|| Rejection(None)) {
        return Json(ErrorBody::from(err));
    }
    let err = match status.code {
        401 => Error::auth("Authentication required"),
        404 => Error::not_found(format!("Nothing at {}", req.uri())),
        _ => {
            return Json(ErrorBody {
                kind: "Error".to_string(),
                message: status.reason_lossy().to_string(),
            })
        }
    };
    Json(ErrorBody::from(&err))
}
