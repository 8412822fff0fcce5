// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sensorwatch_client::{ClientConfig, Dashboard};

mod app;
mod data;
mod events;
mod export;
mod settings;
mod source;
mod ui;

use app::App;
use settings::{Overrides, Settings};
use source::{ChannelSource, DataSource};

/// How often the UI loop drains pending updates.
const UI_TICK: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "sensorwatch")]
#[command(about = "Terminal dashboard for a temperature sensor aggregation service")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the aggregation service
    #[arg(short, long)]
    url: Option<String>,

    /// Service account username
    #[arg(long)]
    username: Option<String>,

    /// Poll interval (e.g., "5s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Per-request timeout (e.g., "10s")
    #[arg(long)]
    timeout: Option<String>,

    /// Number of history samples to chart
    #[arg(long)]
    history_limit: Option<u32>,

    /// Number of recent alerts to list
    #[arg(long)]
    alert_limit: Option<u32>,

    /// Log file (the terminal is taken by the dashboard)
    #[arg(long, default_value = "sensorwatch.log")]
    log_file: PathBuf,

    /// Run one refresh cycle, export the results to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.url.clone(),
            username: self.username.clone(),
            poll_interval: self.interval.clone(),
            request_timeout: self.timeout.clone(),
            history_limit: self.history_limit,
            alert_limit: self.alert_limit,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_file)?;

    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    let config = settings.client_config()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export::export_to_file(config, export_path);
    }

    run_dashboard(config)
}

/// Send `tracing` output to a file so it does not tear the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Log in, start polling and run the TUI until the user quits.
fn run_dashboard(config: ClientConfig) -> Result<()> {
    // The poller runs on this runtime while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;

    let poll_interval = config.poll_interval;
    let (renderer, source) = ChannelSource::create(&config.base_url);
    let mut dashboard = Dashboard::connect(config, Arc::new(renderer))?;

    println!("Connecting to {}...", source.description());
    if let Err(e) = rt.block_on(dashboard.start()) {
        // The fatal error is already queued for the banner
        warn!(error = %e, "Dashboard did not start");
    }

    let result = run_tui(Box::new(source), poll_interval);

    dashboard.shutdown();
    info!("Dashboard shut down");

    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, poll_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, poll_interval);
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with a short timeout
        if let Some(Event::Key(key)) = events::poll_event(UI_TICK)? {
            events::handle_key_event(app, key);
        }

        if last_refresh.elapsed() >= UI_TICK {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
