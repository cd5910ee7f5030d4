use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{admin::AdminSession, position::Position, store::Store};

/// Candidate unique ID, assigned in order of entry starting from 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(u32);

impl CandidateId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person standing for a single position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub position: Position,
    /// Only ever changed by a successful vote.
    pub votes: u32,
    pub added_at: DateTime<Utc>,
}

impl Candidate {
    /// A copy of this candidate with one more vote.
    pub(crate) fn with_vote(&self) -> Self {
        Self {
            votes: self.votes + 1,
            ..self.clone()
        }
    }
}

/// A candidate to be entered, as submitted by an admin or given in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub name: String,
    pub position: Position,
}

/// The positions on offer and the candidates for them, in order of entry.
#[derive(Debug)]
pub(crate) struct CandidateRoll {
    positions: Vec<Position>,
    candidates: Vec<Candidate>,
    next_id: u32,
}

impl CandidateRoll {
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions,
            candidates: Vec::new(),
            next_id: 1,
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn is_position(&self, position: &Position) -> bool {
        self.positions.contains(position)
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn for_position<'s>(
        &'s self,
        position: &'s Position,
    ) -> impl Iterator<Item = &'s Candidate> + 's {
        self.candidates.iter().filter(move |c| &c.position == position)
    }

    /// Check and append a new candidate with no votes.
    pub fn enrol(&mut self, name: &str, position: &Position) -> Result<Candidate> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Please enter candidate name"));
        }
        if !self.is_position(position) {
            return Err(Error::validation(format!("Unknown position: {position}")));
        }

        let candidate = Candidate {
            id: CandidateId(self.next_id),
            name: name.to_string(),
            position: position.clone(),
            votes: 0,
            added_at: Utc::now(),
        };
        self.next_id += 1;
        self.candidates.push(candidate.clone());
        Ok(candidate)
    }

    /// Swap in a new version of an existing candidate, keeping its place.
    pub fn replace(&mut self, candidate: Candidate) {
        if let Some(slot) = self.candidates.iter_mut().find(|c| c.id == candidate.id) {
            *slot = candidate;
        }
    }
}

/// Admin-gated management and public listing of candidates.
pub struct CandidateRegistry<'a> {
    store: &'a Store,
}

impl<'a> CandidateRegistry<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Enter a new candidate. The admin session is checked before anything else.
    pub fn add_candidate(
        &self,
        name: &str,
        position: &Position,
        session: &AdminSession,
    ) -> Result<Candidate> {
        let mut ledger = self.store.write();
        ledger.require_admin(session)?;
        let result = ledger.candidates.enrol(name, position);
        match &result {
            Ok(c) => info!("Added candidate {} ({}) for {}", c.id, c.name, c.position),
            Err(err) => debug!("Refused candidate: {err}"),
        }
        result
    }

    /// All candidates for a position, in the order they were entered.
    pub fn list_by_position(&self, position: &Position) -> Vec<Candidate> {
        self.store
            .read()
            .candidates
            .for_position(position)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: CandidateId) -> Option<Candidate> {
        self.store.read().candidates.get(id).cloned()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.store.read().candidates.positions().to_vec()
    }

    pub fn is_position(&self, position: &Position) -> bool {
        self.store.read().candidates.is_position(position)
    }
}
