//! Layered runtime settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. environment variables prefixed `SENSORWATCH_`, nested keys joined by `__`
//! 4. command-line flags
//!
//! ```toml
//! base_url = "http://fog-node.local:5000"
//! poll_interval = "5s"
//!
//! [service_account]
//! username = "fog_node"
//! password = "secret"
//! ```
//!
//! The password is usually supplied as `SENSORWATCH_SERVICE_ACCOUNT__PASSWORD`.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use sensorwatch_client::ClientConfig;

use crate::data::duration::parse_duration;

const ENV_PREFIX: &str = "SENSORWATCH";

#[derive(Clone, Deserialize)]
pub struct AccountSettings {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AccountSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub service_account: AccountSettings,
    /// Duration string, e.g. "5s".
    pub poll_interval: String,
    /// Duration string, e.g. "10s".
    pub request_timeout: String,
    pub history_limit: u32,
    pub alert_limit: u32,
}

/// Values given on the command line. `None` leaves the layered value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub poll_interval: Option<String>,
    pub request_timeout: Option<String>,
    pub history_limit: Option<u32>,
    pub alert_limit: Option<u32>,
}

impl Settings {
    /// Load from defaults, `path`, the process environment and `overrides`.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(path, None, overrides)
    }

    /// Like [`Settings::load`], reading environment variables from `env`
    /// instead of the process when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let defaults = ClientConfig::default();

        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("service_account.username", defaults.service_account.username)?
            .set_default("service_account.password", defaults.service_account.password)?
            .set_default("poll_interval", "5s")?
            .set_default("request_timeout", "10s")?
            .set_default("history_limit", i64::from(defaults.history_limit))?
            .set_default("alert_limit", i64::from(defaults.alert_limit))?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        let config = builder
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("service_account.username", overrides.username.clone())?
            .set_override_option("poll_interval", overrides.poll_interval.clone())?
            .set_override_option("request_timeout", overrides.request_timeout.clone())?
            .set_override_option("history_limit", overrides.history_limit.map(i64::from))?
            .set_override_option("alert_limit", overrides.alert_limit.map(i64::from))?
            .build()
            .context("Failed to load settings")?;

        config
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Resolve into the client configuration, parsing duration strings.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let poll_interval = parse_duration(&self.poll_interval)
            .with_context(|| format!("Invalid poll_interval: {}", self.poll_interval))?;
        let request_timeout = parse_duration(&self.request_timeout)
            .with_context(|| format!("Invalid request_timeout: {}", self.request_timeout))?;

        Ok(ClientConfig::builder()
            .base_url(self.base_url.clone())
            .credentials(
                self.service_account.username.clone(),
                self.service_account.password.clone(),
            )
            .poll_interval(poll_interval)
            .request_timeout(request_timeout)
            .history_limit(self.history_limit)
            .alert_limit(self.alert_limit)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, no_env(), &Overrides::default()).unwrap();
        let config = settings.client_config().unwrap();

        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.service_account.username, "fog_node");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.alert_limit, 5);
    }

    #[test]
    fn test_file_then_env_then_flags() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
base_url = "http://fog.local:5000"
poll_interval = "2s"
history_limit = 50

[service_account]
username = "from_file"
password = "file-secret"
"#
        )
        .unwrap();

        let mut env = config::Map::new();
        env.insert(
            "SENSORWATCH_SERVICE_ACCOUNT__PASSWORD".to_string(),
            "env-secret".to_string(),
        );
        env.insert("SENSORWATCH_POLL_INTERVAL".to_string(), "3s".to_string());

        let overrides = Overrides {
            poll_interval: Some("750ms".to_string()),
            ..Default::default()
        };

        let settings = Settings::load_with_env(Some(file.path()), Some(env), &overrides).unwrap();
        let config = settings.client_config().unwrap();

        assert_eq!(config.base_url, "http://fog.local:5000");
        assert_eq!(config.service_account.username, "from_file");
        assert_eq!(config.service_account.password, "env-secret");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.poll_interval, Duration::from_millis(750));

        let printed = format!("{:?}", settings);
        assert!(printed.contains("from_file"));
        assert!(!printed.contains("env-secret"));
    }

    #[test]
    fn test_invalid_duration_is_reported() {
        let overrides = Overrides {
            request_timeout: Some("soon".to_string()),
            ..Default::default()
        };
        let settings = Settings::load_with_env(None, no_env(), &overrides).unwrap();
        let err = settings.client_config().unwrap_err();
        assert!(err.to_string().contains("request_timeout"));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = Settings::load_with_env(
            Some(Path::new("/nonexistent/sensorwatch.toml")),
            no_env(),
            &Overrides::default(),
        );
        assert!(result.is_err());
    }
}
