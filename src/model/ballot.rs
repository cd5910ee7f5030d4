use log::{debug, info};

use crate::error::{Error, Result};

use super::{
    candidate::{Candidate, CandidateId},
    position::Position,
    session::Session,
    store::Store,
};

/// Records votes. For each voter and position the only transition is
/// not-voted to voted, and it happens at most once.
pub struct BallotEngine<'a> {
    store: &'a Store,
}

impl<'a> BallotEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Cast `session`'s vote for a candidate, returning the candidate with
    /// its updated count.
    ///
    /// The candidate's count, the voter's record and the session are all
    /// updated together, or not at all.
    pub fn cast_vote(&self, session: &mut Session, candidate_id: CandidateId) -> Result<Candidate> {
        let mut ledger = self.store.write();

        let voter = ledger
            .voter_sessions
            .get(session.token())
            .filter(|email| email.as_str() == session.email())
            .and_then(|email| ledger.voters.get(email))
            .ok_or_else(|| Error::auth("Please login first"))?;
        let candidate = ledger
            .candidates
            .get(candidate_id)
            .ok_or_else(|| Error::not_found(format!("Candidate {candidate_id} not found")))?;

        // The voter record also catches a vote made through an earlier session.
        let position = candidate.position.clone();
        if session.has_voted_for(&position) || voter.has_voted_for(&position) {
            debug!("Refused second vote for {position}");
            return Err(Error::AlreadyVoted(position));
        }

        let candidate = candidate.with_vote();
        let voter = voter.with_vote(position.clone());
        ledger.candidates.replace(candidate.clone());
        ledger.voters.replace(voter);
        session.record_vote(position);

        info!("Vote cast for {}", candidate.position);
        Ok(candidate)
    }

    pub fn has_voted_for_position(&self, session: &Session, position: &Position) -> bool {
        session.has_voted_for(position)
    }
}
