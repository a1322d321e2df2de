// songsearch entry point.
// Loads config, sets up file logging, opens the song store, and runs the TUI.

mod app;
mod config;
mod error;
mod feed;
mod state;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::feed::FeedClient;
use crate::store::{SongStore, paths};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    configure_logging(&config)?;

    let database_path = config.database_path()?;
    let store = Arc::new(SongStore::open(&database_path)?);
    let feed = FeedClient::new(&config.feed)?;
    info!(
        feed = feed.url(),
        database = %database_path.display(),
        cached = store.len()?,
        "starting songsearch"
    );

    let mut terminal = ratatui::init();
    let result = App::new(store, feed).run(&mut terminal);
    ratatui::restore();

    result?;
    Ok(())
}

/// Send tracing output to the log file; the terminal belongs to the UI.
fn configure_logging(config: &Config) -> Result<()> {
    let Some(log_path) = paths::log_path() else {
        return Ok(());
    };
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("info")))
        .map_err(|e| Error::Other(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}
