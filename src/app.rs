//! Application state and navigation logic.

use std::time::Duration;

use anyhow::Result;

use crate::data::DashboardData;
use crate::source::DataSource;
use crate::ui::Theme;

/// The panel that receives scroll keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Temperature history chart.
    Chart,
    /// Recent alert list.
    Alerts,
}

impl Focus {
    /// Move focus to the other panel.
    pub fn toggle(self) -> Self {
        match self {
            Focus::Chart => Focus::Alerts,
            Focus::Alerts => Focus::Chart,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Focus::Chart => "Chart",
            Focus::Alerts => "Alerts",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub focus: Focus,

    // Data source
    source: Box<dyn DataSource>,
    pub data: DashboardData,
    pub load_error: Option<String>,
    pub poll_interval: Duration,

    // Alert list scroll offset
    pub alert_scroll: usize,

    // UI
    pub theme: Theme,
}

impl App {
    /// Create a new App reading from `source`, with the theme detected from the terminal.
    pub fn new(source: Box<dyn DataSource>, poll_interval: Duration) -> Self {
        Self::with_theme(source, poll_interval, Theme::auto_detect())
    }

    pub fn with_theme(source: Box<dyn DataSource>, poll_interval: Duration, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            focus: Focus::Chart,
            source,
            data: DashboardData::new(),
            load_error: None,
            poll_interval,
            alert_scroll: 0,
            theme,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Apply every pending update from the data source.
    ///
    /// Returns Ok(true) if anything changed.
    pub fn reload_data(&mut self) -> Result<bool> {
        let mut changed = false;
        while let Some(event) = self.source.poll() {
            self.data.apply(event);
            changed = true;
        }

        // Fatal startup errors are shown in the banner, not here
        if self.data.fatal.is_none() {
            self.load_error = self.source.error().map(str::to_string);
        }

        self.clamp_scroll();
        Ok(changed)
    }

    /// Switch focus between the chart and the alert list.
    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Scroll the alert list down by one entry.
    pub fn scroll_down(&mut self) {
        self.alert_scroll = self.alert_scroll.saturating_add(1);
        self.clamp_scroll();
    }

    /// Scroll the alert list up by one entry.
    pub fn scroll_up(&mut self) {
        self.alert_scroll = self.alert_scroll.saturating_sub(1);
    }

    pub fn scroll_to_top(&mut self) {
        self.alert_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.alert_scroll = self.data.alert_list().len().saturating_sub(1);
    }

    fn clamp_scroll(&mut self) {
        let max = self.data.alert_list().len().saturating_sub(1);
        self.alert_scroll = self.alert_scroll.min(max);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}
