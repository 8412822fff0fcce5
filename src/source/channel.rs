//! Channel-based data source.
//!
//! [`ChannelRenderer`] is handed to the polling client and forwards every
//! renderer call over an unbounded tokio channel. [`ChannelSource`] drains
//! that channel from the UI thread without blocking.

use tokio::sync::mpsc::{self, error::TryRecvError};

use sensorwatch_client::{AlertRecord, HistoryPoint, JobError, Renderer, StatusView};

use super::{DashboardEvent, DataSource};

/// Renderer that turns each call into a [`DashboardEvent`].
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    sender: mpsc::UnboundedSender<DashboardEvent>,
}

impl ChannelRenderer {
    fn send(&self, event: DashboardEvent) {
        // The UI has gone away; nothing left to draw on.
        let _ = self.sender.send(event);
    }
}

impl Renderer for ChannelRenderer {
    fn render_status(&self, status: Result<StatusView, JobError>) {
        self.send(DashboardEvent::Status(status));
    }

    fn render_series(&self, series: Result<Vec<HistoryPoint>, JobError>) {
        self.send(DashboardEvent::Series(series));
    }

    fn render_alerts(&self, alerts: Result<Vec<AlertRecord>, JobError>) {
        self.send(DashboardEvent::Alerts(alerts));
    }

    fn render_fatal_error(&self, message: &str) {
        self.send(DashboardEvent::Fatal(message.to_string()));
    }
}

/// A data source fed by a [`ChannelRenderer`].
///
/// # Example
///
/// ```
/// use sensorwatch::ChannelSource;
///
/// // The renderer goes to the polling client, the source to the TUI
/// let (renderer, source) = ChannelSource::create("http://localhost:5000");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<DashboardEvent>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a connected renderer/source pair.
    ///
    /// `source_description` names where updates come from, usually the
    /// service base URL.
    pub fn create(source_description: &str) -> (ChannelRenderer, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let source = Self {
            receiver,
            description: source_description.to_string(),
            disconnected: false,
        };
        (ChannelRenderer { sender }, source)
    }

    /// Take every event queued so far.
    pub fn drain(&mut self) -> Vec<DashboardEvent> {
        std::iter::from_fn(|| self.poll()).collect()
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<DashboardEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.disconnected = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        if self.disconnected {
            Some("polling stopped")
        } else {
            None
        }
    }
}
