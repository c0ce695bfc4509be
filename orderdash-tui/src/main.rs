//! orderdash TUI — live six-panel view of the matching engine's CSV files.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use orderdash_core::DashboardConfig;
use orderdash_tui::app::AppState;
use orderdash_tui::poller::{self, PollerCommand};
use orderdash_tui::{input, logging, persistence, ui};

#[derive(Parser, Debug)]
#[command(name = "orderdash-tui", version, about = "Live dashboard for matching engine output")]
struct Args {
    /// Config file (defaults to ./orderdash.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding trades.csv and friends
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Log file (RUST_LOG sets the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Where UI state is saved between runs
    #[arg(long)]
    state_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init_file_logging(&log_path)?;

    let config = DashboardConfig::resolve(args.config.as_deref())
        .context("Failed to load config")?
        .with_overrides(args.data_dir.clone(), args.refresh_ms);
    tracing::info!(
        data_dir = %config.data_dir.display(),
        refresh_ms = config.refresh_ms,
        "starting dashboard"
    );

    let state_path = args
        .state_file
        .clone()
        .unwrap_or_else(persistence::default_state_path);
    let persisted = persistence::load(&state_path);

    // Poller channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let poller_handle = poller::spawn_poller(
        config.sources(),
        config.refresh_interval(),
        cmd_rx,
        resp_tx,
    )
    .context("Failed to start poller thread")?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, &config);
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(path = %state_path.display(), "failed to save UI state: {e:#}");
    }

    // Shutdown poller
    let _ = cmd_tx.send(PollerCommand::Shutdown);
    if poller_handle.join().is_err() {
        tracing::error!("poller thread panicked");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("dashboard closed");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain poller responses (non-blocking)
        app.drain_poller();

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
