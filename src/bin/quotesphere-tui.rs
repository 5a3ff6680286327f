//! QuoteSphere TUI Application
//!
//! A terminal front end for browsing random quotes and jokes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event;

use quotesphere_client::logging::LoggingConfig;
use quotesphere_client::tui::terminal::Tui;
use quotesphere_client::tui::{
    handle_event, install_panic_hook, render, restore_terminal, setup_terminal, AppState,
};
use quotesphere_client::{
    build_source, ChannelRenderer, Config, FetchCoordinator, JsonFileStore, Query, SourceKind,
};

#[derive(Debug, Parser)]
#[command(name = "quotesphere-tui", version, about = "Random quotes in your terminal")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "QUOTESPHERE_CONFIG")]
    config: Option<PathBuf>,

    /// Data source: quotable, jokeapi or embedded
    #[arg(short, long)]
    source: Option<SourceKind>,

    /// Debug-level logging (requires a log file in the configuration)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    if let Some(kind) = cli.source {
        config.source.kind = kind;
    }

    // Logs never go to the terminal we draw on.
    if let Some(file) = config.logging.expanded_file() {
        LoggingConfig::new(
            config.logging.log_format()?,
            config.logging.level.clone(),
            cli.verbose,
        )
        .with_file(Some(file))
        .init()?;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    let source = build_source(&config.source).context("Failed to create data source")?;
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(
        source,
        Arc::new(ChannelRenderer::new(tx)),
        config.fetch.settings(),
    );
    let store = Arc::new(JsonFileStore::new(config.storage.expanded_favorites_path()));
    let mut state = AppState::new(coordinator.clone(), rx, store, config.share.command.clone());

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    coordinator.submit(Query::default());
    let result = run(&mut terminal, &mut state);

    restore_terminal(&mut terminal)?;
    result
}

fn run(terminal: &mut Tui, state: &mut AppState) -> Result<()> {
    loop {
        state.sync_updates();
        state.expire(Instant::now());

        terminal.draw(|f| render(f, state))?;

        if state.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;
            handle_event(event, state);
        }
    }
    Ok(())
}
