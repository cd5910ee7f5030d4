use log::debug;
use rocket::{
    http::Status,
    response::{self, status::Custom, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::position::Position;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way a ballot operation can be refused. None of these are fatal:
/// the shared state is untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DuplicateVoter(String),
    /// The apartment already has its full quota of registered voters.
    #[error("{0}")]
    Capacity(String),
    /// Missing or invalid admin or voter session.
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    #[error("You have already voted for {0}")]
    AlreadyVoted(Position),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// A short machine-readable name for this kind of error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::DuplicateVoter(_) => "DuplicateVoterError",
            Self::Capacity(_) => "CapacityError",
            Self::Auth(_) => "AuthError",
            Self::NotFound(_) => "NotFoundError",
            Self::AlreadyVoted(_) => "AlreadyVotedError",
        }
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::DuplicateVoter(_) | Self::AlreadyVoted(_) => Status::Conflict,
            Self::Capacity(_) => Status::Forbidden,
            Self::Auth(_) => Status::Unauthorized,
            Self::NotFound(_) => Status::NotFound,
        }
    }
}

/// JSON body sent alongside every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        debug!("Rejected {} {}: {}: {}", req.method(), req.uri(), self.kind(), self);
        Custom(self.status(), Json(ErrorBody::from(&self))).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_voted_names_the_position() {
        let err = Error::AlreadyVoted(Position::from("Secretary"));
        assert_eq!(err.to_string(), "You have already voted for Secretary");
        assert_eq!(err.kind(), "AlreadyVotedError");
        assert_eq!(err.status(), Status::Conflict);
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(Error::validation("x").status(), Status::BadRequest);
        assert_eq!(Error::DuplicateVoter("x".into()).status(), Status::Conflict);
        assert_eq!(Error::Capacity("x".into()).status(), Status::Forbidden);
        assert_eq!(Error::auth("x").status(), Status::Unauthorized);
        assert_eq!(Error::not_found("x").status(), Status::NotFound);
    }
}
