use rocket::{response::status::Created, serde::json::Json, Route, State};

use crate::{
    error::Result,
    model::{AdminSession, Candidate, CandidateSpec, Store, Tally},
};

pub fn routes() -> Vec<Route> {
    routes![add_candidate, results]
}

#[post("/candidates", data = "<spec>", format = "json")]
pub async fn add_candidate(
    admin: AdminSession,
    spec: Json<CandidateSpec>,
    store: &State<Store>,
) -> Result<Created<Json<Candidate>>> {
    let candidate = store
        .candidates()
        .add_candidate(&spec.name, &spec.position, &admin)?;
    let location = uri!(super::public::position_candidates(candidate.position.name()));
    Ok(Created::new(location.to_string()).body(Json(candidate)))
}

#[get("/results")]
pub async fn results(admin: AdminSession, store: &State<Store>) -> Result<Json<Tally>> {
    Ok(Json(store.results().tally(&admin)?))
}
