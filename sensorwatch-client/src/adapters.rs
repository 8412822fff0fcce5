//! Pure transforms from service payloads to renderer-ready shapes.
//!
//! Nothing here performs I/O or logs. A payload that cannot be understood
//! becomes [`JobError::Parse`], which the calling job renders as an error.

use serde::Deserialize;
use serde_json::Value;

use sensorwatch_types::{AlertRecord, HistoryPoint, Severity, StatusView};

use crate::error::JobError;

/// Placeholder the service sends before it has received any sample.
const NOT_AVAILABLE: &str = "N/A";

/// A numeric field the service may also report as a placeholder string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reading {
    Number(f64),
    Text(String),
    Null,
}

impl Reading {
    /// `None` for the placeholder or null. Any other non-numeric text is malformed.
    fn value(self, field: &str) -> Result<Option<f64>, JobError> {
        match self {
            Reading::Number(n) => Ok(Some(n)),
            Reading::Null => Ok(None),
            Reading::Text(text) => {
                let text = text.trim();
                if text == NOT_AVAILABLE {
                    return Ok(None);
                }
                text.parse::<f64>()
                    .map(Some)
                    .map_err(|_| JobError::Parse(format!("{}: not a number: {:?}", field, text)))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    status: Option<String>,
    current_temperature: Reading,
    alerts: u64,
    data_points: u64,
    last_update: String,
    #[serde(default)]
    high_alerts: u64,
    #[serde(default)]
    warning_alerts: u64,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    timestamp: String,
    #[serde(default)]
    avg_temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAlert {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default, rename = "type")]
    kind: String,
    message: String,
}

/// Build the status banner view.
///
/// `current_temperature`, `alerts`, `data_points` and `last_update` are
/// required. A `"N/A"` temperature or timestamp means "no reading yet".
pub fn adapt_status(raw: Value) -> Result<StatusView, JobError> {
    let raw: RawStatus = serde_json::from_value(raw)?;

    let last_update = Some(raw.last_update)
        .filter(|ts| !ts.is_empty() && ts.as_str() != NOT_AVAILABLE);

    Ok(StatusView {
        state: raw.status.unwrap_or_else(|| "unknown".to_string()),
        temperature: raw.current_temperature.value("current_temperature")?,
        alert_count: raw.alerts,
        high_alerts: raw.high_alerts,
        warning_alerts: raw.warning_alerts,
        data_points: raw.data_points,
        last_update,
    })
}

/// Build the temperature series, oldest first as sent by the service.
///
/// An empty array is a valid "no data yet" result. Samples without a
/// numeric temperature are skipped.
pub fn adapt_history(raw: Value) -> Result<Vec<HistoryPoint>, JobError> {
    let samples: Vec<RawSample> = serde_json::from_value(raw)?;

    Ok(samples
        .into_iter()
        .filter_map(|s| s.avg_temperature.map(|value| HistoryPoint::new(s.timestamp, value)))
        .collect())
}

/// Build the alert feed. Unrecognised severities become [`Severity::Info`].
pub fn adapt_alerts(raw: Value) -> Result<Vec<AlertRecord>, JobError> {
    let alerts: Vec<RawAlert> = serde_json::from_value(raw)?;

    Ok(alerts
        .into_iter()
        .map(|a| AlertRecord {
            timestamp: a.timestamp,
            severity: a
                .severity
                .as_deref()
                .map(Severity::from_label)
                .unwrap_or_default(),
            category: a.kind,
            message: a.message,
        })
        .collect())
}
