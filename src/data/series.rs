//! Chart geometry for the temperature series.

use sensorwatch_client::HistoryPoint;

/// The y range always covers at least this band (°C).
pub const MIN_Y_BOUNDS: [f64; 2] = [20.0, 45.0];

/// Headroom added around the observed values.
const Y_PADDING: f64 = 2.0;

/// Points for a line chart: x is the sample index, y the temperature.
pub fn chart_points(points: &[HistoryPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect()
}

pub fn x_bounds(points: &[HistoryPoint]) -> [f64; 2] {
    [0.0, (points.len().saturating_sub(1) as f64).max(1.0)]
}

/// Y range padded around the data, never narrower than [`MIN_Y_BOUNDS`].
pub fn y_bounds(points: &[HistoryPoint]) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return MIN_Y_BOUNDS;
    }

    [
        (min - Y_PADDING).min(MIN_Y_BOUNDS[0]).floor(),
        (max + Y_PADDING).max(MIN_Y_BOUNDS[1]).ceil(),
    ]
}

/// Compact time-of-day label for an axis tick.
///
/// `"2024-01-01T12:34:56.789Z"` and `"2024-01-01 12:34:56"` both become
/// `"12:34:56"`; anything unrecognised is returned unchanged.
pub fn short_time(timestamp: &str) -> &str {
    let time = timestamp
        .split_once(['T', ' '])
        .map(|(_, time)| time)
        .unwrap_or(timestamp);

    match time.get(..8) {
        Some(hms) if hms.as_bytes().get(2) == Some(&b':') => hms,
        _ => timestamp,
    }
}
