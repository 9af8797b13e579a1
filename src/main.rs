mod cli;
mod config;
mod console;
mod error;
mod pin;
mod session;
mod store;
mod transform;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Settings;
use console::Terminal;
use session::Session;
use store::file::{FileStore, Loaded};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => Some(config::read(path).context("Failed to read config")?),
        None => None,
    };
    let settings = Settings::resolve(cli.file, file_config);
    tracing::debug!(file = %settings.file.display(), shift = settings.shift, "starting");

    let mut store = FileStore::new(settings.file, settings.shift);
    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", store.path().display()))
        }
    };
    if let Loaded::Existing { entries, skipped } = loaded {
        tracing::info!(entries, skipped, "read passwords file");
    }

    let mut terminal = Terminal;
    let outcome = Session::new(&mut store, &mut terminal).run(&loaded)?;
    tracing::debug!(?outcome, "session ended");

    Ok(())
}
