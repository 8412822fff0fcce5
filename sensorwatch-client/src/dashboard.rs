//! Startup and teardown of the polling engine.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::{AuthError, TransportError};
use crate::fetcher::AuthenticatedFetcher;
use crate::jobs::RefreshJob;
use crate::poller::{run_cycle, Poller};
use crate::renderer::Renderer;
use crate::session::Session;
use crate::transport::{HttpTransport, Transport};

/// Wires session, fetcher and poller together for one renderer.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sensorwatch_client::{ClientConfig, Dashboard, Renderer};
///
/// # async fn run(renderer: Arc<dyn Renderer>) -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:5000")
///     .credentials("fog_node", "secret")
///     .build();
///
/// let mut dashboard = Dashboard::connect(config, renderer)?;
/// dashboard.start().await?;
/// // ... later, on teardown
/// dashboard.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    config: ClientConfig,
    session: Arc<Session>,
    fetcher: Arc<AuthenticatedFetcher>,
    renderer: Arc<dyn Renderer>,
    poller: Poller,
}

impl Dashboard {
    /// Build a dashboard that talks to the configured service over HTTP.
    pub fn connect(config: ClientConfig, renderer: Arc<dyn Renderer>) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.base_url, config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport), renderer))
    }

    /// Build a dashboard on top of any [`Transport`].
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let session = Arc::new(Session::new(
            transport.clone(),
            config.service_account.clone(),
        ));
        let fetcher = Arc::new(AuthenticatedFetcher::new(transport, session.clone()));
        let poller = Poller::new(fetcher.clone(), renderer.clone());

        Self {
            config,
            session,
            fetcher,
            renderer,
            poller,
        }
    }

    /// The ordered job set derived from the configured limits.
    pub fn jobs(&self) -> Vec<RefreshJob> {
        RefreshJob::standard_cycle(self.config.history_limit, self.config.alert_limit)
    }

    /// Log in, then start polling.
    ///
    /// If the initial login fails the renderer receives a fatal error and
    /// no polling begins.
    pub async fn start(&mut self) -> Result<(), AuthError> {
        self.login_or_fatal().await?;

        info!(
            base_url = %self.config.base_url,
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Dashboard started"
        );
        self.poller.start(self.jobs(), self.config.poll_interval).await;
        Ok(())
    }

    /// Log in and run a single cycle without scheduling further ones.
    pub async fn refresh_once(&self) -> Result<(), AuthError> {
        self.login_or_fatal().await?;
        run_cycle(&self.jobs(), &self.fetcher, self.renderer.as_ref()).await;
        Ok(())
    }

    async fn login_or_fatal(&self) -> Result<(), AuthError> {
        if let Err(e) = self.session.login().await {
            error!(error = %e, "Initial login failed");
            self.renderer
                .render_fatal_error(&format!("Startup failed, check the server: {}", e));
            return Err(e);
        }
        Ok(())
    }

    /// Stop scheduling new cycles.
    pub fn stop(&mut self) {
        self.poller.stop();
    }

    /// Stop and abandon any in-flight cycle.
    pub fn shutdown(&mut self) {
        self.poller.abort();
    }

    pub fn is_running(&self) -> bool {
        self.poller.is_running()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("poller", &self.poller)
            .finish()
    }
}
