//! Boundary to the presentation layer.

use sensorwatch_types::{AlertRecord, HistoryPoint, StatusView};

use crate::error::JobError;

/// Consumes the output of refresh jobs.
///
/// Implementations decide how to draw; the core only guarantees that every
/// job reports exactly once per cycle, either with data or with the error
/// that prevented it.
pub trait Renderer: Send + Sync {
    /// Status banner and counters.
    fn render_status(&self, status: Result<StatusView, JobError>);

    /// Temperature series. `Ok(vec![])` means "no data yet", not a failure.
    fn render_series(&self, series: Result<Vec<HistoryPoint>, JobError>);

    /// Alert feed.
    fn render_alerts(&self, alerts: Result<Vec<AlertRecord>, JobError>);

    /// Startup failed and polling will not begin.
    fn render_fatal_error(&self, message: &str);
}
