//! Dashboard body: counters row, temperature chart and alert feed.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph},
    Frame,
};

use sensorwatch_client::HistoryPoint;

use crate::app::{App, Focus};
use crate::data::series::{chart_points, short_time, x_bounds, y_bounds};
use crate::ui::common::describe_error;

/// Render the counters row with the chart and alert panels below it.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(6)]).split(area);
    render_counters(frame, app, rows[0]);

    let panels =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(rows[1]);
    render_chart(frame, app, panels[0]);
    render_alerts(frame, app, panels[1]);
}

fn panel<'a>(app: &App, title: &'a str, focus: Focus) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(app.focus == focus))
}

/// Temperature, alert counts, sample count and last update.
pub fn render_counters(frame: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let line = match app.data.status_view() {
        Some(view) => {
            let temperature = view
                .temperature
                .map(|t| format!("{:.1} °C", t))
                .unwrap_or_else(|| "--".to_string());
            let last_update = view.last_update.as_deref().unwrap_or("--");

            let mut spans = vec![
                Span::styled(" Temperature ", label),
                Span::styled(temperature, value),
                Span::styled("  Alerts ", label),
                Span::styled(view.alert_count.to_string(), value),
            ];
            if view.high_alerts > 0 || view.warning_alerts > 0 {
                spans.push(Span::raw(" ("));
                spans.push(Span::styled(
                    format!("{} high", view.high_alerts),
                    Style::default().fg(app.theme.critical),
                ));
                spans.push(Span::raw(", "));
                spans.push(Span::styled(
                    format!("{} warning", view.warning_alerts),
                    Style::default().fg(app.theme.warning),
                ));
                spans.push(Span::raw(")"));
            }
            spans.extend([
                Span::styled("  Data points ", label),
                Span::styled(view.data_points.to_string(), value),
                Span::styled("  Last update ", label),
                Span::raw(last_update.to_string()),
            ]);
            Line::from(spans)
        }
        None => Line::from(Span::styled(" Temperature --  Alerts --  Data points --", label)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Line chart of the temperature history.
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel(app, " Temperature history ", Focus::Chart);

    let points: &[HistoryPoint] = match &app.data.series {
        Some(Ok(points)) if !points.is_empty() => points.as_slice(),
        Some(Err(e)) => {
            let message = Paragraph::new(format!("History unavailable: {}", describe_error(e)))
                .style(Style::default().fg(app.theme.warning))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }
        _ => {
            let message = Paragraph::new("No data yet")
                .style(Style::default().add_modifier(Modifier::DIM))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }
    };

    let data = chart_points(points);
    let [y_min, y_max] = y_bounds(points);
    let first = points.first().map(|p| short_time(&p.timestamp)).unwrap_or_default();
    let last = points.last().map(|p| short_time(&p.timestamp)).unwrap_or_default();

    let dataset = Dataset::default()
        .name("avg °C")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.series))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds(x_bounds(points))
                .labels(vec![first.to_string(), last.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([y_min, y_max])
                .labels(vec![
                    format!("{:.0}", y_min),
                    format!("{:.0}", (y_min + y_max) / 2.0),
                    format!("{:.0}", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Readable title for an alert type, e.g. `high_temperature` -> "High temperature".
pub fn alert_title(category: &str) -> String {
    let words = category.trim().replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Recent alerts in the order the service sends them, styled by severity.
pub fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel(app, " Recent alerts ", Focus::Alerts);

    if let Some(Err(e)) = &app.data.alerts {
        let message = Paragraph::new(format!("Alerts unavailable: {}", describe_error(e)))
            .style(Style::default().fg(app.theme.warning))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let alerts = app.data.alert_list();
    if alerts.is_empty() {
        let message = Paragraph::new("No recent alerts")
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = alerts
        .iter()
        .map(|alert| {
            let style = app.theme.severity_style(alert.severity);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{:<8}", alert.severity.label().to_uppercase()), style),
                    Span::styled(
                        short_time(&alert.timestamp).to_string(),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::styled(
                        format!("  {}", alert_title(&alert.category)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::raw(format!("  {}", alert.message))),
            ])
        })
        .collect();

    let mut list = List::new(items).block(block);
    if app.focus == Focus::Alerts {
        list = list.highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    let mut state = ListState::default().with_selected(Some(app.alert_scroll));
    frame.render_stateful_widget(list, area, &mut state);
}
