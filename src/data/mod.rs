//! Dashboard state and display helpers.
//!
//! ## Submodules
//!
//! - [`dashboard`]: Latest job results ([`DashboardData`]) and banner state ([`Connectivity`])
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "5s", "500ms")
//! - [`series`]: Chart geometry for the temperature history
//!
//! ## Data Flow
//!
//! ```text
//! DashboardEvent (from the polling client)
//!        │
//!        ▼
//! DashboardData::apply()
//!        │
//!        ├──▶ ui (banner, counters, chart, alerts)
//!        │
//!        └──▶ DashboardData::to_export_json() (headless export)
//! ```

pub mod dashboard;
pub mod duration;
pub mod series;

pub use dashboard::{Connectivity, DashboardData};
