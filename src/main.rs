use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tickstore::server::{ItemServer, shutdown_signal};
use tickstore::store::{SharedStore, snapshot};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, ServeArgs};
use config::Config;

fn setup_logging(level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickstore")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tickstore.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match cli.resolved_command() {
        Commands::Serve(args) => handle_serve_command(&args, config),
        Commands::Inspect { snapshot } => handle_inspect_command(snapshot.as_deref(), config),
    }
}

fn handle_serve_command(args: &ServeArgs, config: &Config) -> Result<()> {
    let (server_config, snapshot_path) = args.resolve(config);
    let addr = server_config.addr();

    info!("Serving on {} with snapshot {}", addr, snapshot_path.display());

    let store = Arc::new(SharedStore::open(&snapshot_path));
    println!(
        "{} {} ({} items from {})",
        "Listening on".green(),
        addr,
        store.count()?,
        snapshot_path.display()
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(ItemServer::new(store, addr).run(shutdown_signal()))?;

    println!("{} {}", "Snapshot saved to".green(), snapshot_path.display());
    Ok(())
}

fn handle_inspect_command(snapshot_path: Option<&Path>, config: &Config) -> Result<()> {
    let path = snapshot_path.unwrap_or(config.storage.snapshot_path.as_path());
    info!("Inspecting snapshot {}", path.display());

    if !path.exists() {
        println!("{} {}", "No snapshot at".yellow(), path.display());
        return Ok(());
    }

    let state = snapshot::load(path);
    let deleted = state.items.values().filter(|item| item.is_deleted()).count();
    let last_tick_time = i64::try_from(state.last_tick)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    println!("{} {}", "Snapshot:".green(), path.display());
    println!("  items:    {} ({} live, {} deleted)", state.items.len(), state.items.len() - deleted, deleted);
    println!("  maxid:    {}", state.max_id);
    println!("  lasttick: {} ({})", state.last_tick, last_tick_time);
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let level = if cli.is_verbose() {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    setup_logging(level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
