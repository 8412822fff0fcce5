// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # sensorwatch
//!
//! A terminal dashboard for a temperature-sensor aggregation service.
//!
//! The polling itself lives in [`sensorwatch_client`]; this crate turns its
//! renderer calls into a live terminal view and adds the command-line,
//! settings and logging around it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  tokio runtime                      main thread              │
//! │  ┌────────────┐   ChannelRenderer   ┌─────────┐   ┌────────┐ │
//! │  │ Dashboard  │────────────────────▶│  app    │──▶│   ui   │ │
//! │  │ (poller)   │   DashboardEvent    │ (state) │   │        │ │
//! │  └────────────┘                     └────┬────┘   └────────┘ │
//! │                                          │                   │
//! │                                   ChannelSource              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, panel focus and alert scrolling
//! - **[`source`]**: The [`DataSource`] trait and the channel bridge from the poller
//! - **[`data`]**: Latest job results, banner state, chart geometry, durations
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`settings`]**: Layered settings (defaults, TOML file, environment, flags)
//! - **[`export`]**: Headless single-cycle JSON export
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the local service, password from the environment
//! SENSORWATCH_SERVICE_ACCOUNT__PASSWORD=secret sensorwatch
//!
//! # Another host, faster refresh
//! sensorwatch --url http://fog-node.local:5000 --interval 2s
//!
//! # One cycle to JSON, no terminal UI
//! sensorwatch --export state.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sensorwatch::{App, ChannelSource};
//! use sensorwatch_client::{ClientConfig, Dashboard};
//!
//! # tokio_test::block_on(async {
//! let (renderer, source) = ChannelSource::create("http://localhost:5000");
//! let config = ClientConfig::builder().credentials("fog_node", "secret").build();
//!
//! let mut dashboard = Dashboard::connect(config, Arc::new(renderer)).unwrap();
//! dashboard.start().await.unwrap();
//!
//! let app = App::new(Box::new(source), Duration::from_secs(5));
//! # });
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod export;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Focus};
pub use data::{Connectivity, DashboardData};
pub use settings::{Overrides, Settings};
pub use source::{ChannelRenderer, ChannelSource, DashboardEvent, DataSource};
