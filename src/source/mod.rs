//! Data source abstraction for receiving dashboard updates.
//!
//! The polling client pushes results through the [`Renderer`] trait from a
//! background task, while the TUI draws from a synchronous loop. A
//! [`DataSource`] is the TUI-side half of that bridge.
//!
//! [`Renderer`]: sensorwatch_client::Renderer

mod channel;

pub use channel::{ChannelRenderer, ChannelSource};

use std::fmt::Debug;

use sensorwatch_client::{AlertRecord, HistoryPoint, JobError, StatusView};

/// One renderer call, captured as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Status(Result<StatusView, JobError>),
    Series(Result<Vec<HistoryPoint>, JobError>),
    Alerts(Result<Vec<AlertRecord>, JobError>),
    /// Startup failed; no further events will follow.
    Fatal(String),
}

/// Trait for receiving dashboard updates from a producer.
///
/// # Example
///
/// ```
/// use sensorwatch::{ChannelSource, DataSource};
///
/// let (_renderer, mut source) = ChannelSource::create("http://localhost:5000");
/// while let Some(event) = source.poll() {
///     println!("{:?}", event);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Take the next pending event.
    ///
    /// Returns `None` when nothing is queued. This method must not block.
    fn poll(&mut self) -> Option<DashboardEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns a message if the source can no longer produce events.
    fn error(&self) -> Option<&str>;
}
