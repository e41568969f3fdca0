mod app;
mod input;
mod seed;

use std::{
    fs::{self, OpenOptions},
    io,
    sync::Mutex,
};

use anyhow::{Context, Result};
use ccrm_core::{
    config::{self, AppConfig},
    RecordStore,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    info!(data_dir = %config.data_dir.display(), "starting ccrm");

    let store = RecordStore::instance();
    if config.seed_demo_data {
        seed::seed_demo_data(&store)?;
    }

    let stdin = io::stdin();
    let mut app = app::CcrmApp::new(config, store, stdin.lock(), io::stdout());
    app.run()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("ccrm.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    // stdout carries the menu
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
