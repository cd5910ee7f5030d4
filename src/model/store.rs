use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};

use super::{
    admin::{AdminAuthority, AdminSession, CredentialProvider},
    ballot::BallotEngine,
    candidate::{CandidateRegistry, CandidateRoll, CandidateSpec},
    position::Position,
    results::ResultsAggregator,
    session::SessionToken,
    voter::{VoterRegistry, VoterRoll},
};

/// The single source of truth for an election: voters, candidates and live
/// sessions, plus the credential check for administrators.
///
/// Cloning a `Store` yields another handle onto the same state. Components
/// borrow it via [`Store::voters`], [`Store::candidates`], [`Store::admin`],
/// [`Store::ballots`] and [`Store::results`].
#[derive(Clone)]
pub struct Store {
    ledger: Arc<RwLock<Ledger>>,
    credentials: Arc<dyn CredentialProvider>,
}

/// Everything guarded by the store's lock.
///
/// Mutations hold the write lock across both their checks and their updates,
/// and only write once every check has passed.
///
/// Each voter and the admin hold at most one live session: logging in again
/// replaces the previous token, so the session tables never outgrow the roll.
#[derive(Debug)]
pub(crate) struct Ledger {
    pub voters: VoterRoll,
    pub candidates: CandidateRoll,
    /// Live voter sessions, mapped to the voter's email.
    pub voter_sessions: HashMap<SessionToken, String>,
    pub admin_session: Option<SessionToken>,
}

impl Ledger {
    pub fn is_admin(&self, session: &AdminSession) -> bool {
        self.admin_session.as_ref() == Some(session.token())
    }

    pub fn require_admin(&self, session: &AdminSession) -> Result<()> {
        if self.is_admin(session) {
            Ok(())
        } else {
            Err(Error::auth("Admin access required"))
        }
    }
}

impl Store {
    /// Create an empty election over a fixed set of positions.
    pub fn new<C>(positions: Vec<Position>, apartment_capacity: usize, credentials: C) -> Self
    where
        C: CredentialProvider + 'static,
    {
        Self::from_roll(CandidateRoll::new(positions), apartment_capacity, credentials)
    }

    /// Create an election with its initial candidates already entered.
    ///
    /// This is the only way to enter candidates without an admin session.
    pub fn with_candidates<C>(
        positions: Vec<Position>,
        apartment_capacity: usize,
        credentials: C,
        candidates: &[CandidateSpec],
    ) -> Result<Self>
    where
        C: CredentialProvider + 'static,
    {
        let mut roll = CandidateRoll::new(positions);
        for spec in candidates {
            roll.enrol(&spec.name, &spec.position)?;
        }
        Ok(Self::from_roll(roll, apartment_capacity, credentials))
    }

    fn from_roll<C>(candidates: CandidateRoll, apartment_capacity: usize, credentials: C) -> Self
    where
        C: CredentialProvider + 'static,
    {
        let ledger = Ledger {
            voters: VoterRoll::new(apartment_capacity),
            candidates,
            voter_sessions: HashMap::new(),
            admin_session: None,
        };
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            credentials: Arc::new(credentials),
        }
    }

    pub fn voters(&self) -> VoterRegistry<'_> {
        VoterRegistry::new(self)
    }

    pub fn candidates(&self) -> CandidateRegistry<'_> {
        CandidateRegistry::new(self)
    }

    pub fn admin(&self) -> AdminAuthority<'_> {
        AdminAuthority::new(self)
    }

    pub fn ballots(&self) -> BallotEngine<'_> {
        BallotEngine::new(self)
    }

    pub fn results(&self) -> ResultsAggregator<'_> {
        ResultsAggregator::new(self)
    }

    pub(crate) fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    // A panic while holding the lock cannot leave the ledger half-written,
    // so a poisoned lock is still safe to use.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.ledger.write().unwrap_or_else(PoisonError::into_inner)
    }
}
