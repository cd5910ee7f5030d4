use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// An elected role, such as "Treasurer". Each position has its own pool of
/// candidates and its own one-vote-per-voter constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Position {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Position {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Example data for tests.
#[cfg(test)]
pub mod examples {
    use super::*;

    impl Position {
        pub fn president() -> Self {
            "Society President".into()
        }

        pub fn secretary() -> Self {
            "Secretary".into()
        }

        pub fn treasurer() -> Self {
            "Treasurer".into()
        }

        pub fn all_examples() -> Vec<Self> {
            vec![Self::president(), Self::secretary(), Self::treasurer()]
        }
    }
}
