//! Leaflens - find a book from a sentence or a photo of a page.
//!
//! A terminal client for a remote book matching service.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use leaflens_cli::app::App;
use leaflens_cli::config::Config;
use leaflens_cli::{input, logging};

fn main() -> Result<()> {
    let (config, config_error) = Config::load_or_default();

    // Nothing owns the terminal yet, so problems can still go to stderr
    match logging::init(&config.logging) {
        Ok(Some(path)) => tracing::info!(log = %path.display(), "Logging started"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }
    if let Some(e) = config_error {
        let message = format!("{:#}", e);
        tracing::warn!(error = %message, "Ignoring unreadable config file");
        eprintln!("Warning: using default config: {}", message);
    }

    // Searches and reveals run on the worker threads; the UI loop stays on
    // this thread and only spawns onto the runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    // Restore the terminal before printing a panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_http(&config);
    tracing::info!(endpoint = app.endpoint(), "Leaflens started");

    let res = input::run_app(&mut terminal, &mut app, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
