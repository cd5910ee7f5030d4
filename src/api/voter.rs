use rocket::{response::status::Created, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{AdminSession, Store, Voter, VoterRegistration},
};

pub fn routes() -> Vec<Route> {
    routes![register, voter_by_email]
}

#[post("/voters", data = "<registration>", format = "json")]
pub async fn register(
    registration: Json<VoterRegistration>,
    store: &State<Store>,
) -> Result<Created<Json<Voter>>> {
    let voter = store
        .voters()
        .register(&registration.email, &registration.apartment_no)?;
    let location = uri!(voter_by_email(voter.email.as_str()));
    Ok(Created::new(location.to_string()).body(Json(voter)))
}

#[get("/voters/<email>")]
pub async fn voter_by_email(
    email: &str,
    admin: AdminSession,
    store: &State<Store>,
) -> Result<Json<Voter>> {
    store.admin().require(&admin)?;
    store
        .voters()
        .find_by_email(email)
        .map(Json)
        .ok_or_else(|| Error::not_found(format!("No voter registered as {email}")))
}
