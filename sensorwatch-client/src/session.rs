//! Bearer credential ownership.
//!
//! [`Session`] is the single owner of the current credential. It is only
//! ever replaced by [`Session::login`] or cleared by [`Session::invalidate`];
//! everything else reads it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ServiceAccount;
use crate::error::AuthError;
use crate::transport::{ApiRequest, Transport};

pub(crate) const LOGIN_PATH: &str = "/api/login";

/// Opaque bearer token. Expiry is only discovered through a 401.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    pub fn token(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value for this credential.
    pub fn header_value(&self) -> Result<HeaderValue, AuthError> {
        HeaderValue::from_str(&format!("Bearer {}", self.0))
            .map_err(|_| AuthError::Parse("token is not a valid header value".to_string()))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Holds at most one credential and knows how to acquire a new one.
pub struct Session {
    transport: Arc<dyn Transport>,
    account: ServiceAccount,
    credential: RwLock<Option<Credential>>,
}

impl Session {
    /// Create an empty session. No network activity happens until `login()`.
    pub fn new(transport: Arc<dyn Transport>, account: ServiceAccount) -> Self {
        Self {
            transport,
            account,
            credential: RwLock::new(None),
        }
    }

    /// Perform one login exchange and store the resulting credential.
    ///
    /// Exactly one request is sent per call. Failures are not cached and
    /// never retried here.
    pub async fn login(&self) -> Result<Credential, AuthError> {
        debug!(username = %self.account.username, "Logging in");

        let request = ApiRequest::post(LOGIN_PATH)
            .basic_auth(&self.account.username, &self.account.password)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!(status = response.status.as_u16(), "Login rejected");
            return Err(AuthError::Rejected {
                status: response.status.as_u16(),
            });
        }

        let body: LoginResponse =
            serde_json::from_slice(&response.body).map_err(|e| AuthError::Parse(e.to_string()))?;

        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let credential = Credential::new(token);
        credential.header_value()?;
        *self.credential.write() = Some(credential.clone());
        info!("Login succeeded");

        Ok(credential)
    }

    /// The stored credential, if any. Never touches the network.
    pub fn current_credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    /// Discard the stored credential.
    pub fn invalidate(&self) {
        if self.credential.write().take().is_some() {
            debug!("Credential invalidated");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("authenticated", &self.credential.read().is_some())
            .finish()
    }
}
