use rocket::{serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{Candidate, Position, Store},
};

pub fn routes() -> Vec<Route> {
    routes![positions, position_candidates]
}

#[get("/positions")]
pub async fn positions(store: &State<Store>) -> Json<Vec<Position>> {
    Json(store.candidates().positions())
}

/// Candidates for one position, in the order they were entered.
#[get("/positions/<position>/candidates")]
pub async fn position_candidates(position: &str, store: &State<Store>) -> Result<Json<Vec<Candidate>>> {
    let position = Position::from(position);
    let candidates = store.candidates();
    if !candidates.is_position(&position) {
        return Err(Error::not_found(format!("No such position: {position}")));
    }
    Ok(Json(candidates.list_by_position(&position)))
}
