use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{
    position::Position,
    session::{Session, SessionToken},
    store::Store,
};

/// A registered voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    /// Unique across the registry.
    pub email: String,
    pub apartment_no: String,
    /// Positions this voter has already voted for. Only ever grows.
    pub voted_positions: BTreeSet<Position>,
    pub registered_at: DateTime<Utc>,
}

impl Voter {
    fn new(email: String, apartment_no: String) -> Self {
        Self {
            email,
            apartment_no,
            voted_positions: BTreeSet::new(),
            registered_at: Utc::now(),
        }
    }

    pub fn has_voted_for(&self, position: &Position) -> bool {
        self.voted_positions.contains(position)
    }

    /// A copy of this voter with `position` recorded as voted.
    pub(crate) fn with_vote(&self, position: Position) -> Self {
        let mut voted_positions = self.voted_positions.clone();
        voted_positions.insert(position);
        Self {
            voted_positions,
            ..self.clone()
        }
    }
}

/// A registration request, as submitted by a prospective voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRegistration {
    pub email: String,
    pub apartment_no: String,
}

/// The registered voters, keyed by email.
#[derive(Debug)]
pub(crate) struct VoterRoll {
    voters: HashMap<String, Voter>,
    apartment_capacity: usize,
}

impl VoterRoll {
    pub fn new(apartment_capacity: usize) -> Self {
        Self {
            voters: HashMap::new(),
            apartment_capacity,
        }
    }

    pub fn get(&self, email: &str) -> Option<&Voter> {
        self.voters.get(email)
    }

    /// How many voters are registered against an apartment.
    pub fn occupancy(&self, apartment_no: &str) -> usize {
        self.voters
            .values()
            .filter(|v| v.apartment_no == apartment_no)
            .count()
    }

    /// Check and insert a new voter.
    pub fn admit(&mut self, email: &str, apartment_no: &str) -> Result<Voter> {
        let (email, apartment_no) = (email.trim(), apartment_no.trim());
        if email.is_empty() || apartment_no.is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }
        if self.voters.contains_key(email) {
            return Err(Error::DuplicateVoter(
                "This email is already registered".to_string(),
            ));
        }
        if self.occupancy(apartment_no) >= self.apartment_capacity {
            return Err(Error::Capacity(format!(
                "Maximum {} voters allowed per apartment",
                self.apartment_capacity
            )));
        }

        let voter = Voter::new(email.to_string(), apartment_no.to_string());
        self.voters.insert(voter.email.clone(), voter.clone());
        Ok(voter)
    }

    /// Swap in a new version of an existing voter.
    pub fn replace(&mut self, voter: Voter) {
        self.voters.insert(voter.email.clone(), voter);
    }
}

/// Registration, lookup and login of voters.
pub struct VoterRegistry<'a> {
    store: &'a Store,
}

impl<'a> VoterRegistry<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a new voter with no votes cast.
    pub fn register(&self, email: &str, apartment_no: &str) -> Result<Voter> {
        let result = self.store.write().voters.admit(email, apartment_no);
        match &result {
            Ok(voter) => info!("Registered voter for apartment {}", voter.apartment_no),
            Err(err) => debug!("Refused voter registration: {err}"),
        }
        result
    }

    pub fn find_by_email(&self, email: &str) -> Option<Voter> {
        self.store.read().voters.get(email.trim()).cloned()
    }

    /// Start a session for a registered voter, seeded with what they have
    /// already voted for. Any earlier session of theirs ends.
    pub fn login(&self, email: &str) -> Result<Session> {
        let mut ledger = self.store.write();
        let voter = ledger
            .voters
            .get(email.trim())
            .cloned()
            .ok_or_else(|| Error::not_found("Voter not found. Please register first."))?;

        let token = SessionToken::generate();
        ledger.voter_sessions.retain(|_, owner| *owner != voter.email);
        ledger
            .voter_sessions
            .insert(token.clone(), voter.email.clone());
        debug!("Voter session opened");
        Ok(Session::new(token, voter.email, voter.voted_positions))
    }

    /// Rebuild the session behind a previously issued token.
    pub fn resume(&self, token: &SessionToken) -> Result<Session> {
        let ledger = self.store.read();
        let voter = ledger
            .voter_sessions
            .get(token)
            .and_then(|email| ledger.voters.get(email))
            .ok_or_else(|| Error::auth("Please login first"))?;
        Ok(Session::new(
            token.clone(),
            voter.email.clone(),
            voter.voted_positions.clone(),
        ))
    }

    /// End a session. Ending an unknown session is not an error.
    pub fn logout(&self, token: &SessionToken) {
        if self.store.write().voter_sessions.remove(token).is_some() {
            debug!("Voter session closed");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_registration_in_apartment_fails() {
        let store = Store::empty_example();
        let voters = store.voters();
        voters.register("alice@x.com", "Apt1").unwrap();
        voters.register("bob@x.com", "Apt1").unwrap();

        let err = voters.register("carol@x.com", "Apt1").unwrap_err();
        assert!(matches!(err, Error::Capacity(_)));
        assert!(voters.find_by_email("carol@x.com").is_none());

        // Other apartments are unaffected.
        voters.register("carol@x.com", "Apt3").unwrap();
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = Store::empty_example();
        let voters = store.voters();
        let alice = voters.register("alice@x.com", "Apt1").unwrap();

        let err = voters.register("alice@x.com", "Apt7").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateVoter("This email is already registered".to_string())
        );
        assert_eq!(voters.find_by_email("alice@x.com"), Some(alice));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let store = Store::empty_example();
        let voters = store.voters();

        assert!(matches!(
            voters.register("", "Apt1"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            voters.register("eve@x.com", "   "),
            Err(Error::Validation(_))
        ));
        assert!(voters.find_by_email("").is_none());
        assert!(voters.find_by_email("eve@x.com").is_none());
    }

    #[test]
    fn duplicate_is_reported_before_capacity() {
        let store = Store::empty_example();
        let voters = store.voters();
        voters.register("alice@x.com", "Apt1").unwrap();
        voters.register("bob@x.com", "Apt1").unwrap();

        assert!(matches!(
            voters.register("alice@x.com", "Apt1"),
            Err(Error::DuplicateVoter(_))
        ));
    }

    #[test]
    fn new_voter_has_not_voted() {
        let store = Store::empty_example();
        let voter = store.voters().register(" dan@x.com ", "Apt2").unwrap();
        assert_eq!(voter.email, "dan@x.com");
        assert!(voter.voted_positions.is_empty());
    }

    #[test]
    fn login_requires_registration() {
        let store = Store::empty_example();
        let err = store.voters().login("nobody@x.com").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn login_resume_logout() {
        let store = Store::empty_example();
        let voters = store.voters();
        voters.register("dan@x.com", "Apt2").unwrap();

        let session = voters.login("dan@x.com").unwrap();
        assert_eq!(session.email(), "dan@x.com");
        assert!(session.voted_positions().is_empty());
        assert_eq!(voters.resume(session.token()).unwrap(), session);

        voters.logout(session.token());
        assert!(matches!(
            voters.resume(session.token()),
            Err(Error::Auth(_))
        ));
        // Idempotent.
        voters.logout(session.token());
    }

    #[test]
    fn relogin_replaces_session() {
        let store = Store::empty_example();
        let voters = store.voters();
        voters.register("dan@x.com", "Apt2").unwrap();
        voters.register("eve@x.com", "Apt3").unwrap();
        let eve = voters.login("eve@x.com").unwrap();

        let mut latest = voters.login("dan@x.com").unwrap();
        for _ in 0..10 {
            let next = voters.login("dan@x.com").unwrap();
            assert!(matches!(
                voters.resume(latest.token()),
                Err(Error::Auth(_))
            ));
            latest = next;
        }

        assert!(voters.resume(latest.token()).is_ok());
        assert!(voters.resume(eve.token()).is_ok());
        assert_eq!(store.read().voter_sessions.len(), 2);
    }
}
