//! Refresh jobs: one fetch-transform-render unit each.

use serde_json::Value;
use tracing::warn;

use crate::adapters::{adapt_alerts, adapt_history, adapt_status};
use crate::error::JobError;
use crate::fetcher::AuthenticatedFetcher;
use crate::renderer::Renderer;
use crate::transport::ApiRequest;

/// A unit of work within a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshJob {
    /// `GET /api/status` rendered as the status banner.
    Status,
    /// `GET /api/history?limit=N` rendered as the temperature series.
    History { limit: u32 },
    /// `GET /api/alerts?limit=N` rendered as the alert feed.
    Alerts { limit: u32 },
}

impl RefreshJob {
    /// The fixed ordered job set of one poll cycle: status, history, alerts.
    pub fn standard_cycle(history_limit: u32, alert_limit: u32) -> Vec<RefreshJob> {
        vec![
            RefreshJob::Status,
            RefreshJob::History {
                limit: history_limit,
            },
            RefreshJob::Alerts { limit: alert_limit },
        ]
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            RefreshJob::Status => "status",
            RefreshJob::History { .. } => "history",
            RefreshJob::Alerts { .. } => "alerts",
        }
    }

    /// The request this job sends.
    pub fn request(&self) -> ApiRequest {
        match self {
            RefreshJob::Status => ApiRequest::get("/api/status"),
            RefreshJob::History { limit } => ApiRequest::get("/api/history").query("limit", limit),
            RefreshJob::Alerts { limit } => ApiRequest::get("/api/alerts").query("limit", limit),
        }
    }

    /// Fetch, adapt and render. Failures are rendered, never returned.
    pub async fn run(&self, fetcher: &AuthenticatedFetcher, renderer: &dyn Renderer) {
        let payload = self.fetch(fetcher).await;

        match self {
            RefreshJob::Status => {
                renderer.render_status(self.traced(payload.and_then(adapt_status)));
            }
            RefreshJob::History { .. } => {
                renderer.render_series(self.traced(payload.and_then(adapt_history)));
            }
            RefreshJob::Alerts { .. } => {
                renderer.render_alerts(self.traced(payload.and_then(adapt_alerts)));
            }
        }
    }

    fn traced<T>(&self, result: Result<T, JobError>) -> Result<T, JobError> {
        if let Err(ref e) = result {
            warn!(job = self.name(), error = %e, "Refresh job failed");
        }
        result
    }

    async fn fetch(&self, fetcher: &AuthenticatedFetcher) -> Result<Value, JobError> {
        let response = fetcher.request(self.request()).await?;

        if !response.is_success() {
            return Err(JobError::Http {
                status: response.status.as_u16(),
            });
        }

        response.json()
    }
}
