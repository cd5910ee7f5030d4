use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{admin::AdminSession, candidate::Candidate, position::Position, store::Store};

/// The standings for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResults {
    pub position: Position,
    /// Most votes first; equal counts keep their entry order.
    pub candidates: Vec<Candidate>,
}

impl PositionResults {
    pub fn total_votes(&self) -> u32 {
        self.candidates.iter().map(|c| c.votes).sum()
    }
}

/// Ranked results for every position, in configured position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally(Vec<PositionResults>);

impl Tally {
    /// The ranked candidates for a single position.
    pub fn position(&self, position: &Position) -> Option<&[Candidate]> {
        self.0
            .iter()
            .find(|r| &r.position == position)
            .map(|r| r.candidates.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionResults> {
        self.0.iter()
    }
}

/// Admin-only view of the election standings.
pub struct ResultsAggregator<'a> {
    store: &'a Store,
}

impl<'a> ResultsAggregator<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn tally(&self, session: &AdminSession) -> Result<Tally> {
        let ledger = self.store.read();
        ledger.require_admin(session)?;

        let results = ledger
            .candidates
            .positions()
            .iter()
            .map(|position| {
                let mut candidates = ledger
                    .candidates
                    .for_position(position)
                    .cloned()
                    .collect::<Vec<_>>();
                // `sort_by` is stable, so ties stay in entry order.
                candidates.sort_by(|a, b| b.votes.cmp(&a.votes));
                PositionResults {
                    position: position.clone(),
                    candidates,
                }
            })
            .collect();
        debug!("Tallied results");
        Ok(Tally(results))
    }
}
