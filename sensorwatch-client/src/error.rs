//! Error types for the polling client.
//!
//! The taxonomy mirrors where a failure happens: the wire ([`TransportError`]),
//! the login exchange ([`AuthError`]), the authenticated request pipeline
//! ([`FetchError`]) and a single refresh job ([`JobError`]).

use thiserror::Error;

/// Network-level failure. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, unreachable host.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Any other failure while sending the request or reading the body.
    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// The login exchange did not produce a credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The service answered with a non-success status.
    #[error("Login rejected with status {status}")]
    Rejected { status: u16 },

    /// The service answered 2xx but without a token.
    #[error("Login response did not contain a token")]
    MissingToken,

    /// The login request never got an answer.
    #[error("Login failed: {0}")]
    Transport(#[from] TransportError),

    /// The login response body was not valid JSON.
    #[error("Failed to parse login response: {0}")]
    Parse(String),
}

/// Failure of the authenticated request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No valid credential could be obtained, even after re-login.
    #[error("Not authenticated: {0}")]
    Unauthenticated(#[source] AuthError),

    /// The request itself failed on the network.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure of one refresh job within a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Non-401, non-2xx status returned by the service.
    #[error("Service returned status {status}")]
    Http { status: u16 },

    /// The service answered 2xx but the payload was malformed or incomplete.
    #[error("Malformed response: {0}")]
    Parse(String),
}

impl JobError {
    /// Whether the failure means the service could not be reached or
    /// would not accept us, as opposed to a bad answer from a reachable one.
    pub fn is_offline(&self) -> bool {
        matches!(self, JobError::Fetch(_))
    }
}

impl From<serde_json::Error> for JobError {
    fn from(err: serde_json::Error) -> Self {
        JobError::Parse(err.to_string())
    }
}
