use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod app;
mod client;
mod config;
mod handler;
mod logging;
mod state;
mod tui;
mod ui;

use app::App;
use client::QueryClient;
use config::{Config, ENDPOINT_ENV};
use tui::{EventHandler, Tui, TICK_RATE};

#[derive(Parser)]
#[command(name = "inventory-chat")]
#[command(about = "Chat with the warehouse inventory query assistant")]
#[command(version)]
struct Cli {
    /// Query endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,
    /// Save --endpoint to the config file for future runs
    #[arg(long, requires = "endpoint")]
    save: bool,
    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match cli.log_file {
        Some(path) => path,
        None => logging::default_log_path()?,
    };
    logging::init_tracing(&log_path)?;

    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "could not read config, using defaults");
        Config::new()
    });

    if cli.save {
        if let Some(endpoint) = cli.endpoint.as_deref() {
            Config::save_endpoint(endpoint)?;
            info!(endpoint, "saved endpoint to config");
        }
    }

    let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref(), env_endpoint.as_deref());
    info!(%endpoint, "starting inventory chat");

    let mut app = App::new(QueryClient::new(&endpoint));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    terminal.show_cursor()?;

    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }

        app.poll_query_task().await;
    }

    Ok(())
}
