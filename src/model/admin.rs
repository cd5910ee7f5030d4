use argon2::{Config, Error as Argon2Error};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{session::SessionToken, store::Store};

/// Decides whether a username and password identify an administrator.
pub trait CredentialProvider: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single admin account with an argon2-encoded password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedCredential {
    username: String,
    password_hash: String,
}

impl HashedCredential {
    /// Wrap an existing encoded hash, checking that it is well-formed.
    pub fn new(username: String, password_hash: String) -> std::result::Result<Self, Argon2Error> {
        argon2::verify_encoded(&password_hash, b"")?;
        Ok(Self {
            username,
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The argon2-encoded hash, suitable for `admin_password_hash`.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or_else(|e| {
            warn!("Admin password hash could not be checked: {e}");
            false
        })
    }
}

impl CredentialProvider for HashedCredential {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Always hash, so a wrong username costs the same as a wrong password.
        let password_ok = self.verify_password(password);
        password_ok && username == self.username
    }
}

/// Raw admin credentials, received from a user. These are never stored
/// directly, since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for HashedCredential {
    type Error = Argon2Error;

    /// Hash the password with a fresh random salt.
    fn try_from(cred: AdminCredentials) -> std::result::Result<Self, Self::Error> {
        // 16 bytes is the recommended salt length for password hashing.
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash = argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default())?;
        Ok(Self {
            username: cred.username,
            password_hash,
        })
    }
}

/// Proof of administrative privilege, valid until logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    token: SessionToken,
}

impl AdminSession {
    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

impl From<SessionToken> for AdminSession {
    fn from(token: SessionToken) -> Self {
        Self { token }
    }
}

/// Admin login and session checks.
pub struct AdminAuthority<'a> {
    store: &'a Store,
}

impl<'a> AdminAuthority<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn login(&self, credentials: &AdminCredentials) -> Result<AdminSession> {
        if !self
            .store
            .credentials()
            .verify(&credentials.username, &credentials.password)
        {
            debug!("Refused admin login for {:?}", credentials.username);
            return Err(Error::auth("Invalid admin credentials"));
        }

        // One admin session at a time; a new login ends the previous one.
        let token = SessionToken::generate();
        self.store.write().admin_session = Some(token.clone());
        info!("Admin {:?} logged in", credentials.username);
        Ok(AdminSession { token })
    }

    pub fn is_authenticated(&self, session: &AdminSession) -> bool {
        self.store.read().is_admin(session)
    }

    /// Like [`Self::is_authenticated`], but as an error for `?`.
    pub fn require(&self, session: &AdminSession) -> Result<()> {
        self.store.read().require_admin(session)
    }

    /// Invalidate a session. Invalidating an unknown session is not an error.
    pub fn logout(&self, session: &AdminSession) {
        let mut ledger = self.store.write();
        if ledger.is_admin(session) {
            ledger.admin_session = None;
            info!("Admin logged out");
        }
    }
}

/// Example data for tests.
#[cfg(test)]
pub mod examples {
    use super::*;

    impl HashedCredential {
        pub fn example() -> Self {
            Self {
                username: "coordinator".to_string(),
                password_hash: "$argon2i$v=19$m=4096,t=2,p=1$VzJlNzBsa0ZUeGFCNVVucA$01vYAqN0vTeqhZEzW7q9PWmrZlXtzQ/Ns7NkCNE2mA0".to_string(),
            }
        }
    }

    impl AdminCredentials {
        pub fn example() -> Self {
            Self {
                username: "coordinator".into(),
                password: "coordinator".into(),
            }
        }

        pub fn wrong_password() -> Self {
            Self {
                username: "coordinator".into(),
                password: "admin".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }
}
