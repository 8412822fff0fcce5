//! Latest results received from the polling client.

use std::time::Instant;

use serde_json::{json, Value};

use sensorwatch_client::{AlertRecord, HistoryPoint, JobError, StatusView};

use crate::source::DashboardEvent;

/// What the banner should say about the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// No status result has arrived yet.
    Connecting,
    /// The latest status request succeeded.
    Online,
    /// The latest status request never got an answer, or could not authenticate.
    Offline,
    /// The service answered, but with an error or an unreadable payload.
    Degraded,
    /// Startup failed and polling never began.
    Failed,
}

/// The most recent result of each refresh job.
///
/// Each field holds whatever the last cycle produced, data or error; a
/// later success replaces an earlier error and vice versa.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub status: Option<Result<StatusView, JobError>>,
    pub series: Option<Result<Vec<HistoryPoint>, JobError>>,
    pub alerts: Option<Result<Vec<AlertRecord>, JobError>>,
    pub fatal: Option<String>,
    pub last_updated: Option<Instant>,
}

impl DashboardData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the current state.
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Status(result) => self.status = Some(result),
            DashboardEvent::Series(result) => self.series = Some(result),
            DashboardEvent::Alerts(result) => self.alerts = Some(result),
            DashboardEvent::Fatal(message) => self.fatal = Some(message),
        }
        self.last_updated = Some(Instant::now());
    }

    pub fn connectivity(&self) -> Connectivity {
        if self.fatal.is_some() {
            return Connectivity::Failed;
        }
        match &self.status {
            None => Connectivity::Connecting,
            Some(Ok(_)) => Connectivity::Online,
            Some(Err(e)) if e.is_offline() => Connectivity::Offline,
            Some(Err(_)) => Connectivity::Degraded,
        }
    }

    /// The latest status view, if the last status job succeeded.
    pub fn status_view(&self) -> Option<&StatusView> {
        self.status.as_ref().and_then(|r| r.as_ref().ok())
    }

    /// Alerts from the last successful alert job, or an empty slice.
    pub fn alert_list(&self) -> &[AlertRecord] {
        match &self.alerts {
            Some(Ok(alerts)) => alerts,
            _ => &[],
        }
    }

    /// Snapshot as JSON: `{status, history, alerts}`.
    ///
    /// A job that failed is reported as its error message string; a job that
    /// never reported is `null`.
    pub fn to_export_json(&self) -> Value {
        let mut export = json!({
            "status": export_result(&self.status),
            "history": export_result(&self.series),
            "alerts": export_result(&self.alerts),
        });
        if let Some(ref fatal) = self.fatal {
            export["fatal"] = json!(fatal);
        }
        export
    }
}

fn export_result<T: serde::Serialize>(result: &Option<Result<T, JobError>>) -> Value {
    match result {
        None => Value::Null,
        Some(Ok(value)) => serde_json::to_value(value).unwrap_or(Value::Null),
        Some(Err(e)) => Value::String(e.to_string()),
    }
}
