use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use data_encoding::BASE64URL_NOPAD;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::position::Position;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 32;

/// An opaque bearer token identifying a voter or admin session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh, unguessable token.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill(&mut bytes);
        Self(BASE64URL_NOPAD.encode(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A logged-in voter. Carries the positions they have voted for, kept in
/// step with their registry record by the ballot engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    token: SessionToken,
    email: String,
    voted_positions: BTreeSet<Position>,
}

impl Session {
    pub(crate) fn new(token: SessionToken, email: String, voted_positions: BTreeSet<Position>) -> Self {
        Self {
            token,
            email,
            voted_positions,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn voted_positions(&self) -> &BTreeSet<Position> {
        &self.voted_positions
    }

    pub fn has_voted_for(&self, position: &Position) -> bool {
        self.voted_positions.contains(position)
    }

    pub(crate) fn record_vote(&mut self, position: Position) {
        self.voted_positions.insert(position);
    }
}
