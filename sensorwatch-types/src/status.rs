//! Status banner and counters.

use alloc::string::String;

/// Current state of the aggregation service as shown in the status banner.
///
/// `temperature` and `last_update` are `None` when the service has not
/// received any sensor data yet. That is a valid state, not a failure.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusView {
    /// Service-reported state label (e.g. "operational").
    pub state: String,

    /// Latest averaged temperature in °C.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub temperature: Option<f64>,

    /// Total number of alerts raised by the service.
    pub alert_count: u64,

    /// Alerts with `high` severity.
    pub high_alerts: u64,

    /// Alerts with `warning` severity.
    pub warning_alerts: u64,

    /// Number of samples held by the service.
    pub data_points: u64,

    /// Timestamp of the latest sample, verbatim from the service.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub last_update: Option<String>,
}

impl StatusView {
    /// Whether the service has reported at least one reading.
    pub fn has_reading(&self) -> bool {
        self.temperature.is_some()
    }
}
