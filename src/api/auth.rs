use rocket::{
    http::{CookieJar, Status},
    serde::json::Json,
    Route, State,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{AdminCredentials, AdminSession, Session, SessionToken, Store},
};

use super::token::{token_cookie, ADMIN_COOKIE, SESSION_COOKIE};

pub fn routes() -> Vec<Route> {
    routes![login, current, logout, admin_login, admin_logout]
}

/// A voter's login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// The token handed out on a successful admin login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLogin {
    pub token: SessionToken,
}

#[post("/sessions", data = "<request>", format = "json")]
pub async fn login(
    request: Json<LoginRequest>,
    cookies: &CookieJar<'_>,
    store: &State<Store>,
) -> Result<Json<Session>> {
    let session = store.voters().login(&request.email)?;
    cookies.add(token_cookie(SESSION_COOKIE, session.token()));
    Ok(Json(session))
}

#[get("/sessions/current")]
pub async fn current(session: Session) -> Json<Session> {
    Json(session)
}

#[delete("/sessions")]
pub async fn logout(
    session: Option<Session>,
    cookies: &CookieJar<'_>,
    store: &State<Store>,
) -> Status {
    if let Some(session) = session {
        store.voters().logout(session.token());
    }
    cookies.remove(SESSION_COOKIE);
    Status::Ok
}

#[post("/admin/sessions", data = "<credentials>", format = "json")]
pub async fn admin_login(
    credentials: Json<AdminCredentials>,
    cookies: &CookieJar<'_>,
    store: &State<Store>,
) -> Result<Json<AdminLogin>> {
    let session = store.admin().login(&credentials)?;
    cookies.add(token_cookie(ADMIN_COOKIE, session.token()));
    Ok(Json(AdminLogin {
        token: session.token().clone(),
    }))
}

#[delete("/admin/sessions")]
pub async fn admin_logout(
    session: Option<AdminSession>,
    cookies: &CookieJar<'_>,
    store: &State<Store>,
) -> Status {
    if let Some(session) = session {
        store.admin().logout(&session);
    }
    cookies.remove(ADMIN_COOKIE);
    Status::Ok
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Header},
        local::asynchronous::Client,
        serde::json::serde_json::json,
    };

    use super::*;

    use crate::error::ErrorBody;

    #[backend_test]
    async fn admin_login_valid(client: Client, store: Store) {
        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(json!(AdminCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(ADMIN_COOKIE).is_some());
        let login = response.into_json::<AdminLogin>().await.unwrap();
        assert!(store
            .admin()
            .is_authenticated(&AdminSession::from(login.token)));
    }

    #[backend_test]
    async fn admin_login_invalid(client: Client) {
        for credentials in [AdminCredentials::wrong_password(), AdminCredentials::empty()] {
            let response = client
                .post(uri!(admin_login))
                .header(ContentType::JSON)
                .body(json!(credentials).to_string())
                .dispatch()
                .await;

            assert_eq!(Status::Unauthorized, response.status());
            assert_eq!(None, client.cookies().get(ADMIN_COOKIE));
            let body = response.into_json::<ErrorBody>().await.unwrap();
            assert_eq!(body.message, "Invalid admin credentials");
        }
    }

    #[backend_test(admin)]
    async fn admin_logout_invalidates(client: Client, store: Store) {
        let token = client.cookies().get(ADMIN_COOKIE).unwrap().value().to_string();
        let session = AdminSession::from(SessionToken::from(token));
        assert!(store.admin().is_authenticated(&session));

        let response = client.delete(uri!(admin_logout)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(None, client.cookies().get(ADMIN_COOKIE));
        assert!(!store.admin().is_authenticated(&session));
    }

    #[backend_test]
    async fn voter_login(client: Client, store: Store) {
        store.voters().register("dan@x.com", "Apt2").unwrap();

        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!({ "email": "dan@x.com" }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(SESSION_COOKIE).is_some());
        let session = response.into_json::<Session>().await.unwrap();
        assert_eq!(session.email(), "dan@x.com");
        assert!(session.voted_positions().is_empty());
    }

    #[backend_test]
    async fn unregistered_voter_login(client: Client) {
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!({ "email": "nobody@x.com" }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::NotFound, response.status());
        assert_eq!(None, client.cookies().get(SESSION_COOKIE));
        let body = response.into_json::<ErrorBody>().await.unwrap();
        assert_eq!(body.message, "Voter not found. Please register first.");
    }

    #[backend_test(voter)]
    async fn current_session(client: Client) {
        let response = client.get(uri!(current)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let session = response.into_json::<Session>().await.unwrap();
        assert_eq!(session.email(), "dan@x.com");
    }

    #[backend_test]
    async fn bearer_token_accepted(client: Client, store: Store) {
        store.voters().register("dan@x.com", "Apt2").unwrap();
        let session = store.voters().login("dan@x.com").unwrap();

        let response = client
            .get(uri!(current))
            .header(Header::new(
                "Authorization",
                format!("Bearer {}", session.token()),
            ))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
    }

    #[backend_test(voter)]
    async fn logout_voter(client: Client) {
        let response = client.delete(uri!(logout)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(None, client.cookies().get(SESSION_COOKIE));

        let response = client.get(uri!(current)).dispatch().await;
        assert_eq!(Status::Unauthorized, response.status());
        let body = response.into_json::<ErrorBody>().await.unwrap();
        assert_eq!(body.kind, "AuthError");
    }

    #[backend_test]
    async fn logout_not_logged_in(client: Client) {
        let response = client.delete(uri!(logout)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
    }
}
