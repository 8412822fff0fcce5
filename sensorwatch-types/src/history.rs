//! Temperature history samples.

use alloc::string::String;

/// One point of the temperature time series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryPoint {
    /// Sample timestamp, verbatim from the service.
    pub timestamp: String,
    /// Averaged temperature in °C.
    pub value: f64,
}

impl HistoryPoint {
    /// Create a new history point.
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}
