//! Luna TUI Entry Point
//!
//! Launches the terminal preview of the Luna face.
//!
//! Usage:
//!   luna-tui [--cat]
//!
//! Configuration is read from `$LUNA_CONFIG` or `$XDG_CONFIG_HOME/luna/face.toml`,
//! then overridden by `LUNA_*` environment variables. Logs go to
//! `luna-tui.log` in the current directory (filter with `RUST_LOG`).

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use luna_tui::App;

const LOG_FILE: &str = "luna-tui.log";

const DEFAULT_LOG_FILTER: &str = "luna_tui=info,luna_face_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a file; the terminal belongs to the preview
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let log = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log)),
        )
        .with(filter)
        .init();

    let mut config = luna_face_core::load_config().context("loading configuration")?;
    if std::env::args().skip(1).any(|arg| arg == "--cat") {
        config.cat_mode = true;
    }

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("luna-tui requires a terminal (TTY)");
        std::process::exit(1);
    }

    // Restore the terminal before printing a panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: luna_face_core::EngineConfig,
) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.run(terminal).await
}
