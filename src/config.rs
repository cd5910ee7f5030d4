use std::collections::HashSet;

use argon2::Error as Argon2Error;
use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;
use thiserror::Error;

use crate::error::Error;
use crate::model::{AdminCredentials, CandidateSpec, HashedCredential, Position, Store};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default = "default_positions")]
    positions: Vec<Position>,
    #[serde(default = "default_apartment_capacity")]
    apartment_capacity: usize,
    #[serde(default = "default_candidates")]
    candidates: Vec<CandidateSpec>,
    admin_username: String,
    // secrets
    #[serde(default)]
    admin_password_hash: Option<String>,
    #[serde(default)]
    admin_password: Option<String>,
}

/// Reasons the configuration cannot describe an election.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("At least one position must be configured")]
    NoPositions,
    #[error("Position configured twice: {0}")]
    DuplicatePosition(Position),
    #[error("`apartment_capacity` must be at least 1")]
    ZeroCapacity,
    #[error("Exactly one of `admin_password_hash` or `admin_password` must be set")]
    AdminPassword,
    #[error("`admin_password_hash` is not a valid argon2 hash: {0}")]
    PasswordHash(#[from] Argon2Error),
    #[error("Bad seed candidate: {0}")]
    Candidate(#[from] Error),
}

impl Config {
    /// The fixed set of elected positions, in display order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Maximum number of registered voters sharing one apartment.
    pub fn apartment_capacity(&self) -> usize {
        self.apartment_capacity
    }

    /// Candidates entered when the election is created.
    pub fn candidates(&self) -> &[CandidateSpec] {
        &self.candidates
    }

    /// Check the configuration and build the election store from it.
    pub fn build_store(&self) -> Result<Store, ConfigError> {
        if self.positions.is_empty() {
            return Err(ConfigError::NoPositions);
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.positions.iter().find(|p| !seen.insert(*p)) {
            return Err(ConfigError::DuplicatePosition(dup.clone()));
        }
        if self.apartment_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let store = Store::with_candidates(
            self.positions.clone(),
            self.apartment_capacity,
            self.admin_credential()?,
            &self.candidates,
        )?;
        Ok(store)
    }

    /// The admin account, from either a stored hash or a plaintext password
    /// that is hashed here and never kept.
    fn admin_credential(&self) -> Result<HashedCredential, ConfigError> {
        let username = self.admin_username.clone();
        match (&self.admin_password_hash, &self.admin_password) {
            (Some(hash), None) => Ok(HashedCredential::new(username, hash.clone())?),
            (None, Some(password)) => {
                warn!("Admin password given in plaintext; prefer `admin_password_hash`");
                let credential = HashedCredential::try_from(AdminCredentials {
                    username,
                    password: password.clone(),
                })?;
                info!("Hashed admin password: {}", credential.password_hash());
                Ok(credential)
            }
            _ => Err(ConfigError::AdminPassword),
        }
    }
}

fn default_positions() -> Vec<Position> {
    ["Society President", "Secretary", "Treasurer"]
        .into_iter()
        .map(Position::from)
        .collect()
}

fn default_apartment_capacity() -> usize {
    2
}

fn default_candidates() -> Vec<CandidateSpec> {
    [
        ("John Doe", "Society President"),
        ("Jane Smith", "Society President"),
        ("Mike Johnson", "Secretary"),
        ("Sarah Wilson", "Secretary"),
        ("Robert Brown", "Treasurer"),
    ]
    .into_iter()
    .map(|(name, position)| CandidateSpec {
        name: name.to_string(),
        position: position.into(),
    })
    .collect()
}

/// A fairing that loads the application config, builds the election store
/// from it, and places both into managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Set up the election.
        let store = match config.build_store() {
            Ok(store) => store,
            Err(e) => {
                error!("Invalid election config: {e}");
                return Err(rocket);
            }
        };
        info!(
            "Election ready: {} positions, {} candidates, {} voters per apartment",
            config.positions().len(),
            config.candidates().len(),
            config.apartment_capacity()
        );

        // Manage the state.
        rocket = rocket.manage(config).manage(store);
        Ok(rocket)
    }
}
