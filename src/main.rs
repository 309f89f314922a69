use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use stacksync::catalog::pool::catalog_for;
use stacksync::config::{SyncConfig, data_dir};
use stacksync::sync::controller::SyncController;
use stacksync::sync::state::StackState;
use stacksync::sync::subscriber::NotificationSubscriber;

#[derive(Parser)]
#[command(name = "stacksync")]
#[command(version, about = "Watches the tech stack version catalog for live changes")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the documentation server (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Target database name (overrides the config file)
    #[arg(long)]
    database: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SyncConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {:?}", path))
        }
        None => Ok(SyncConfig::default()),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(database) = cli.database {
        config.database = database;
    }

    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let file_appender = tracing_appender::rolling::never(&data_dir, "stacksync.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let service = catalog_for(&config.base_url, &config.database);
    let controller = Arc::new(SyncController::new(service.clone()));

    if let Err(e) = controller.initial_load().await {
        // The subscriber-driven refreshes may still recover, keep going
        eprintln!("Initial catalog load failed: {e}");
    }

    match controller.sync_meta().await {
        Ok(meta) => println!(
            "Last ingested commit {} at {}",
            meta.last_sync_commit_id, meta.last_sync_timestamp
        ),
        Err(e) => warn!("Sync metadata unavailable: {}", e),
    }

    print_state(&controller.state());

    let subscriber = NotificationSubscriber::new(service.watch_url(), controller.clone())
        .with_backoff(
            Duration::from_millis(config.reconnect.initial_delay_ms),
            Duration::from_millis(config.reconnect.max_delay_ms),
        );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed = tokio::spawn(async move { subscriber.run(shutdown_rx).await });

    let mut state_rx = controller.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_state(&state_rx.borrow());
            }
        }
    }

    shutdown_tx.send(true).ok();
    feed.await?;

    Ok(())
}

fn print_state(state: &StackState) {
    let selected = state.selected.as_deref().unwrap_or("-");
    let marker = if state.has_pending_update() {
        " (update available)"
    } else {
        ""
    };
    println!(
        "{} versions, viewing {}{}",
        state.versions.len(),
        selected,
        marker
    );
}
