//! Common UI components.
//!
//! This module contains the header banner, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use sensorwatch_client::JobError;

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::Connectivity;

/// Render the header banner with the service state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let connectivity = app.data.connectivity();
    let indicator_style = app.theme.connectivity_style(connectivity);

    let mut spans = vec![
        Span::styled(" ● ", indicator_style),
        Span::styled("SENSORWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
    ];

    match connectivity {
        Connectivity::Connecting => spans.push(Span::raw("Connecting...")),
        Connectivity::Online => {
            spans.push(Span::styled("ONLINE", indicator_style));
            if let Some(view) = app.data.status_view() {
                spans.push(Span::raw(format!(" │ {}", view.state)));
                if view.high_alerts > 0 {
                    spans.push(Span::raw(" │ "));
                    spans.push(Span::styled(
                        format!("{} high", view.high_alerts),
                        app.theme.connectivity_style(Connectivity::Failed),
                    ));
                }
            }
        }
        Connectivity::Offline => {
            spans.push(Span::styled("SYSTEM OFFLINE", indicator_style));
            spans.push(Span::raw(format!(" │ {}", status_error(app).unwrap_or_default())));
        }
        Connectivity::Degraded => {
            spans.push(Span::styled("SERVICE ERROR", indicator_style));
            spans.push(Span::raw(format!(" │ {}", status_error(app).unwrap_or_default())));
        }
        Connectivity::Failed => {
            spans.push(Span::styled("STARTUP FAILED", indicator_style));
            if let Some(ref message) = app.data.fatal {
                spans.push(Span::raw(format!(" │ {}", message)));
            }
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_error(app: &App) -> Option<String> {
    match &app.data.status {
        Some(Err(e)) => Some(describe_error(e)),
        _ => None,
    }
}

/// Short, user-facing description of a job failure.
pub fn describe_error(error: &JobError) -> String {
    match error {
        JobError::Http { status } => format!("service answered {}", status),
        other => other.to_string(),
    }
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, refresh interval, controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let controls = "Tab:focus ↑↓:scroll ?:help q:quit";

    let status = if let Some(ref err) = app.load_error {
        format!(" {} | Error: {} | q:quit", app.source_description(), err)
    } else if let Some(updated) = app.data.last_updated {
        format!(
            " {} | Updated {:.1}s ago | every {} | [{}] {}",
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            format_duration(app.poll_interval),
            app.focus.label(),
            controls,
        )
    } else {
        format!(" {} | Waiting for data... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab ←/→     Switch panel focus"),
        Line::from("  ↑/↓ j/k     Scroll alerts"),
        Line::from("  Home/End    First/last alert"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Apply pending updates"),
        Line::from("  ?         Toggle help"),
        Line::from("  q Esc     Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
