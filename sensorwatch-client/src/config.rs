//! Client configuration.
//!
//! Everything here is supplied from outside: the core never computes the
//! service address, identity, cadence or limits.

use std::fmt;
use std::time::Duration;

/// Fixed service-account identity used for the Basic-auth login exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    pub username: String,
    pub password: String,
}

impl ServiceAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for the polling client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the aggregation service (no trailing slash).
    pub base_url: String,
    pub service_account: ServiceAccount,
    /// Delay between the start of consecutive poll cycles.
    pub poll_interval: Duration,
    /// `limit` query parameter for the history endpoint.
    pub history_limit: u32,
    /// `limit` query parameter for the alerts endpoint.
    pub alert_limit: u32,
    /// Per-request timeout applied by the HTTP transport.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    poll_interval: Option<Duration>,
    history_limit: Option<u32>,
    alert_limit: Option<u32>,
    request_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the service base URL (default: "http://localhost:5000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the service-account username and password.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the poll interval (default: 5 seconds).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set the number of history samples requested per cycle (default: 20).
    pub fn history_limit(mut self, limit: u32) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Set the number of alerts requested per cycle (default: 5).
    pub fn alert_limit(mut self, limit: u32) -> Self {
        self.alert_limit = Some(limit);
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:5000".to_string());

        ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_account: ServiceAccount {
                username: self.username.unwrap_or_else(|| "fog_node".to_string()),
                password: self.password.unwrap_or_default(),
            },
            poll_interval: self.poll_interval.unwrap_or(Duration::from_secs(5)),
            history_limit: self.history_limit.unwrap_or(20),
            alert_limit: self.alert_limit.unwrap_or(5),
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(10)),
        }
    }
}
