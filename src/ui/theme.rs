//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use sensorwatch_client::Severity;

use crate::data::Connectivity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and the focused panel.
    pub highlight: Color,
    pub warning: Color,
    pub critical: Color,
    pub healthy: Color,
    /// Color for informational alerts.
    pub info: Color,
    /// Color for borders of unfocused panels.
    pub border: Color,
    /// Line color of the temperature chart.
    pub series: Color,
    /// Style for section titles.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            info: Color::Gray,
            border: Color::Gray,
            series: Color::LightRed,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            info: Color::DarkGray,
            border: Color::DarkGray,
            series: Color::Red,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for an alert severity
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => Style::default().fg(self.info),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::High => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    /// Get style for the banner indicator
    pub fn connectivity_style(&self, connectivity: Connectivity) -> Style {
        match connectivity {
            Connectivity::Connecting => Style::default().fg(self.info),
            Connectivity::Online => Style::default().fg(self.healthy),
            Connectivity::Degraded => Style::default().fg(self.warning),
            Connectivity::Offline | Connectivity::Failed => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Border style for a panel, accented when it has focus
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.border)
        }
    }
}
