//! places-tui: a terminal browser for places.
//!
//! Lists places sorted by name or by rating, refreshes them from a remote
//! JSON endpoint and falls back to the last copy saved locally.

mod app;
mod cli;
mod data;
mod list;
mod logging;
mod presenter;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use cli::{AppConfig, Cli, Commands};
use data::{PlaceService, RemoteClient, Storage};
use presenter::{DisplaySurface, ListPresenter};

/// Wire storage, the remote client and preferences into a presenter
fn build_presenter<D: DisplaySurface>(config: &AppConfig, surface: D) -> Result<ListPresenter<D>> {
    let storage = Storage::new(config.db_path.clone());
    let remote = config
        .endpoint
        .as_ref()
        .map(|endpoint| RemoteClient::new(endpoint.clone(), config.timeout))
        .transpose()
        .context("Failed to build HTTP client")?;

    let repository = Arc::new(PlaceService::new(storage.clone(), remote));
    Ok(ListPresenter::new(repository, Box::new(storage), surface))
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match cli.command {
        Commands::Browse {
            source,
            tick_ms,
            log_file,
        } => {
            let config = AppConfig::resolve(source, tick_ms, log_file);
            logging::init_file_logger(&config.log_path)?;
            tracing::info!(db = ?config.db_path, endpoint = ?config.endpoint, "starting browser");

            let presenter = build_presenter(&config, app::TerminalSurface::default())?;

            // Fetch tasks run on the runtime's workers while the UI loop owns this thread
            let _guard = runtime.enter();
            app::run(presenter, config.tick_rate)?;
        }
        Commands::List {
            source,
            sort,
            refresh,
        } => {
            let config = AppConfig::resolve(source, 100, None);
            logging::init_stderr_logger()?;

            let presenter = build_presenter(&config, list::PlainSurface::default())?;
            runtime.block_on(list::run(presenter, sort.map(Into::into), refresh))?;
        }
    }

    Ok(())
}
