//! Standalone host for the `RtsMod` city layer.
//!
//! Plays the part of the embedding host: it drives the lifecycle hooks, runs
//! the tick loop, and reads `rts` commands from stdin.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `rtsmod-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Open storage under the world root and load every city
//! 4. Run the tick loop and console until Ctrl-C
//! 5. Flush every city and exit

mod console;
mod error;
mod sink;

use std::path::Path;
use std::time::Duration;

use rtsmod_core::config::GameConfig;
use rtsmod_core::lifecycle::Coordinator;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::console::Presence;
use crate::error::ServerError;
use crate::sink::LogSink;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "rtsmod-config.yaml";

/// Capacity of the console line queue.
const CONSOLE_QUEUE: usize = 64;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // 1. Load configuration.
    let (config, from_file) = load_config(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("rtsmod-server starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        world_root = %config.storage.world_root.display(),
        tick_interval_ms = config.tick.tick_interval_ms,
        sync_interval_ticks = config.tick.sync_interval_ticks,
        autosave_interval_ticks = config.tick.autosave_interval_ticks,
        production_interval_ticks = config.tick.production_interval_ticks,
        "Configuration loaded"
    );

    // 3. Start the registry.
    let mut coordinator = Coordinator::new(config.tick.clone());
    let registry = coordinator.on_start(&config.storage.world_root);
    let stats = registry.stats();
    info!(
        cities = stats.cities,
        buildings = stats.buildings,
        units = stats.units,
        "Game state ready"
    );

    // 4. Console reader.
    let (tx, mut rx) = mpsc::channel::<String>(CONSOLE_QUEUE);
    tokio::spawn(async move {
        if let Err(e) = console::read_stdin(tx).await {
            error!(error = %e, "console reader failed");
        }
    });

    let mut interval = tokio::time::interval(Duration::from_millis(
        config.tick.tick_interval_ms.max(1),
    ));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let sink = LogSink;
    let mut presence = Presence::default();
    let mut console_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Entering tick loop");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = coordinator.on_tick(&presence.online(), &sink);
                if report.reaped > 0 || report.completed_buildings > 0 || report.upgraded > 0 {
                    debug!(
                        tick = report.tick,
                        completed = report.completed_buildings,
                        reaped = report.reaped,
                        upgraded = report.upgraded,
                        "tick"
                    );
                }
            }
            line = rx.recv(), if console_open => {
                let Some(line) = line else {
                    info!("Console closed; running until Ctrl-C");
                    console_open = false;
                    continue;
                };
                if let Some(reply) = console::handle_line(&line, &registry, &mut presence) {
                    println!("{reply}");
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!(error = %e, "failed to listen for shutdown signal");
                }
                info!("Shutdown requested");
                break;
            }
        }
    }

    // 5. Flush and exit.
    drop(registry);
    if let Some(report) = coordinator.on_stop() {
        info!(
            saved = report.saved,
            failed = report.failed,
            "rtsmod-server shutdown complete"
        );
    }
    Ok(())
}

/// Load configuration from `path`, falling back to defaults if it is absent.
///
/// Returns the config and whether it came from the file.
fn load_config(path: &Path) -> Result<(GameConfig, bool), ServerError> {
    if path.exists() {
        Ok((GameConfig::from_file(path)?, true))
    } else {
        Ok((GameConfig::parse("")?, false))
    }
}
