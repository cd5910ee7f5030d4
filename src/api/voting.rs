use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{Candidate, CandidateId, Position, Session, Store},
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, voting_status]
}

/// The candidate a voter wishes to vote for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub candidate_id: CandidateId,
}

/// Confirmation of a recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub candidate: Candidate,
    pub votes: u32,
    pub message: String,
}

/// Whether the voter may still vote for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStatus {
    pub position: Position,
    pub voted: bool,
}

#[post("/votes", data = "<vote>", format = "json")]
pub async fn cast_vote(
    mut session: Session,
    vote: Json<VoteRequest>,
    store: &State<Store>,
) -> Result<Json<VoteReceipt>> {
    let candidate = store.ballots().cast_vote(&mut session, vote.candidate_id)?;
    Ok(Json(VoteReceipt {
        votes: candidate.votes,
        message: format!("Vote cast successfully for {}!", candidate.position),
        candidate,
    }))
}

#[get("/votes/status")]
pub async fn voting_status(session: Session, store: &State<Store>) -> Json<Vec<PositionStatus>> {
    let ballots = store.ballots();
    let statuses = store
        .candidates()
        .positions()
        .into_iter()
        .map(|position| PositionStatus {
            voted: ballots.has_voted_for_position(&session, &position),
            position,
        })
        .collect();
    Json(statuses)
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::json,
    };

    use super::*;

    use crate::error::ErrorBody;

    async fn vote<'c>(client: &'c Client, id: CandidateId) -> LocalResponse<'c> {
        client
            .post(uri!(cast_vote))
            .header(ContentType::JSON)
            .body(json!({ "candidateId": id }).to_string())
            .dispatch()
            .await
    }

    fn secretary_ids(store: &Store) -> Vec<CandidateId> {
        store
            .candidates()
            .list_by_position(&Position::secretary())
            .iter()
            .map(|c| c.id)
            .collect()
    }

    #[backend_test(voter)]
    async fn vote_once_per_position(client: Client, store: Store) {
        let ids = secretary_ids(&store);

        let response = vote(&client, ids[0]).await;
        assert_eq!(Status::Ok, response.status());
        let receipt = response.into_json::<VoteReceipt>().await.unwrap();
        assert_eq!(receipt.votes, 1);
        assert_eq!(receipt.message, "Vote cast successfully for Secretary!");

        for id in ids {
            let response = vote(&client, id).await;
            assert_eq!(Status::Conflict, response.status());
            let body = response.into_json::<ErrorBody>().await.unwrap();
            assert_eq!(body.kind, "AlreadyVotedError");
            assert_eq!(body.message, "You have already voted for Secretary");
        }

        let voter = store.voters().find_by_email("dan@x.com").unwrap();
        assert!(voter.has_voted_for(&Position::secretary()));
    }

    #[backend_test(voter)]
    async fn vote_for_unknown_candidate(client: Client) {
        let response = vote(&client, CandidateId::new(99)).await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn vote_without_login(client: Client, store: Store) {
        let id = secretary_ids(&store)[0];
        let response = vote(&client, id).await;
        assert_eq!(Status::Unauthorized, response.status());
        let body = response.into_json::<ErrorBody>().await.unwrap();
        assert_eq!(body.message, "Please login first");
    }

    #[backend_test(voter)]
    async fn status_tracks_votes(client: Client, store: Store) {
        let id = secretary_ids(&store)[1];
        assert_eq!(Status::Ok, vote(&client, id).await.status());

        let response = client.get(uri!(voting_status)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let statuses = response.into_json::<Vec<PositionStatus>>().await.unwrap();
        let voted = statuses
            .into_iter()
            .map(|s| (s.position, s.voted))
            .collect::<Vec<_>>();
        assert_eq!(
            voted,
            [
                (Position::president(), false),
                (Position::secretary(), true),
                (Position::treasurer(), false),
            ]
        );
    }
}
