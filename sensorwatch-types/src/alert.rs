//! Alert feed records.

use alloc::string::String;
use core::fmt;

/// Closed severity classification for alerts.
///
/// The service sends severity as free-form text; anything that is not
/// recognised falls back to [`Severity::Info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    #[default]
    Info,
    Warning,
    High,
}

impl Severity {
    /// Classify a severity label sent by the service.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("high") {
            Severity::High
        } else if label.eq_ignore_ascii_case("warning") {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    /// Canonical lowercase name.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entry of the alert feed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertRecord {
    /// When the alert was raised, verbatim from the service.
    pub timestamp: String,
    pub severity: Severity,
    /// Alert kind as reported by the service (e.g. "high_temperature").
    pub category: String,
    pub message: String,
}

impl AlertRecord {
    /// Create a new alert record.
    pub fn new(
        timestamp: impl Into<String>,
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            severity,
            category: category.into(),
            message: message.into(),
        }
    }
}
