//! # sensorwatch-client
//!
//! Polling client for a temperature-sensor monitoring service.
//!
//! The client logs in with a service account, keeps the bearer token it
//! receives, and on a fixed cadence fetches three resources from the service:
//!
//! - **status**: current temperature, alert counters and last update time
//! - **history**: recent averaged temperatures for the chart
//! - **alerts**: recent threshold alerts with severities
//!
//! Each payload is reshaped into a renderer-ready value from
//! [`sensorwatch_types`] and handed to a [`Renderer`]. A `401` answer causes
//! one transparent re-login and one resend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sensorwatch_client::{
//!     AlertRecord, ClientConfig, Dashboard, HistoryPoint, JobError, Renderer, StatusView,
//! };
//!
//! struct Printer;
//!
//! impl Renderer for Printer {
//!     fn render_status(&self, status: Result<StatusView, JobError>) {
//!         println!("{:?}", status);
//!     }
//!     fn render_series(&self, series: Result<Vec<HistoryPoint>, JobError>) {
//!         println!("{:?}", series);
//!     }
//!     fn render_alerts(&self, alerts: Result<Vec<AlertRecord>, JobError>) {
//!         println!("{:?}", alerts);
//!     }
//!     fn render_fatal_error(&self, message: &str) {
//!         eprintln!("{}", message);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .credentials("fog_node", "secret")
//!         .build();
//!
//!     let mut dashboard = Dashboard::connect(config, Arc::new(Printer))?;
//!     dashboard.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     dashboard.shutdown();
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod jobs;
pub mod poller;
pub mod renderer;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, ClientConfigBuilder, ServiceAccount};
pub use dashboard::Dashboard;
pub use error::{AuthError, FetchError, JobError, TransportError};
pub use fetcher::AuthenticatedFetcher;
pub use jobs::RefreshJob;
pub use poller::{run_cycle, PollHandle, Poller};
pub use renderer::Renderer;
pub use session::{Credential, Session};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

// Re-export types for convenience
pub use sensorwatch_types::{AlertRecord, HistoryPoint, Severity, StatusView};
