pub mod admin;
pub mod ballot;
pub mod candidate;
pub mod position;
pub mod results;
pub mod session;
pub mod store;
pub mod voter;

pub use admin::{AdminAuthority, AdminCredentials, AdminSession, CredentialProvider, HashedCredential};
pub use ballot::BallotEngine;
pub use candidate::{Candidate, CandidateId, CandidateRegistry, CandidateSpec};
pub use position::Position;
pub use results::{PositionResults, ResultsAggregator, Tally};
pub use session::{Session, SessionToken};
pub use store::Store;
pub use voter::{Voter, VoterRegistration, VoterRegistry};
