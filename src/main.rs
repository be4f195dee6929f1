// ABOUTME: Main entry point for the inder order bot
// ABOUTME: Initializes logging and config, logs in to Matrix, then runs the sync loop and the bot loop

use anyhow::{Context, Result};
use clap::Parser;
use inder::{config::Config, matrix_client, platform::MatrixRoomChannel};
use inder_core::{traits::RoomChannel, OrderBot};
use matrix_sdk::{config::SyncSettings, Client};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sync long-poll timeout
const SYNC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "inder", version, about = "Matrix order bot")]
struct Args {
    /// Path to config.toml (defaults to $INDER_CONFIG_PATH, ./config.toml, then the XDG config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default to info, but suppress backup and crypto warnings
        "info,matrix_sdk_crypto::backups=error,matrix_sdk_crypto::session_manager::sessions=error"
            .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Initial sync to upload device keys, then continuous sync from its token
async fn run_sync(client: Client) -> Result<()> {
    tracing::info!("Performing initial sync...");
    let response = client
        .sync_once(SyncSettings::default())
        .await
        .context("Initial sync failed")?;
    tracing::info!("Initial sync complete");

    let settings = SyncSettings::default()
        .token(response.next_batch)
        .timeout(SYNC_TIMEOUT);
    tracing::info!("Starting continuous sync loop");
    client.sync(settings).await.context("Sync loop failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env so MATRIX_* overrides are visible to Config::load_from
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_logging(args.json_logs);

    tracing::info!("Starting inder order bot");

    let config = Config::load_from(args.config.as_deref())?;
    let matrix = &config.matrix;

    tracing::info!(
        homeserver = %matrix.home_server,
        user_id = %matrix.user_id,
        room_id = %matrix.room_id,
        "Configuration loaded"
    );

    let client = matrix_client::create_client(matrix).await?;
    matrix_client::login(&client, matrix).await?;

    let channel = Arc::new(MatrixRoomChannel::new(client.clone())?);

    // Register the handler before the first sync so its timeline reaches the gate
    let events = channel.event_stream().await?;

    // Joining up front makes the room known without waiting for a sync, so the
    // greeting and the consumer can start while the initial sync is running
    channel.ensure_joined(&matrix.room_id).await?;
    let bot = OrderBot::new(Arc::clone(&channel), matrix.room_id.clone());

    let sync_task = tokio::spawn(run_sync(client.clone()));

    tokio::select! {
        result = bot.run(events) => {
            result?;
        }
        result = sync_task => {
            result.context("Sync task panicked")??;
            tracing::warn!("Sync loop ended");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received ctrl-c, shutting down");
        }
    }

    Ok(())
}
