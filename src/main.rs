//! sensorsim - main entry point
//!
//! Loads configuration, resolves credentials from the environment and runs
//! the publish loop until SIGINT/SIGTERM. Exit code 0 on signal-triggered
//! shutdown, nonzero on configuration or connection-setup failures.

use clap::{Parser, Subcommand};
use sensorsim::config::SimulatorConfig;
use sensorsim::observability::init_default_logging;
use sensorsim::publisher::Publisher;
use sensorsim::transport::mqtt::{publish_topic, MqttClient};
use std::path::PathBuf;
use std::process;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};

/// Synthetic sensor telemetry publisher for ThingSpeak MQTT channels
#[derive(Parser)]
#[command(name = "sensorsim")]
#[command(about = "Publishes synthetic sensor readings to a ThingSpeak MQTT channel")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to sensorsim.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulator
    Run,
    /// Validate configuration
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();
    info!("starting sensorsim v{}", env!("CARGO_PKG_VERSION"));

    let config = match SimulatorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_simulator(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }

    info!("shutdown complete");
}

async fn run_simulator(config: SimulatorConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Credentials are checked before any network activity; missing ones are
    // a fatal configuration error
    let credentials = config.resolve_credentials()?;

    info!(
        broker = %credentials.broker_host,
        port = credentials.broker_port,
        topic = %publish_topic(&credentials.channel_id),
        client_id = %credentials.client_id,
        username = %credentials.username,
        interval_secs = config.publish.interval_secs,
        "sensor simulator configured"
    );

    let transport = MqttClient::new(&credentials);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    spawn_signal_listener(shutdown_tx)?;

    let publisher = Publisher::new(
        transport,
        config.publish_interval(),
        config.poll_backoff(),
        shutdown_rx,
    );
    publisher.run().await?;
    Ok(())
}

/// Forward SIGINT/SIGTERM into the shutdown channel so every sleep in the
/// publish loop wakes promptly
fn spawn_signal_listener(
    shutdown_tx: watch::Sender<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => info!("received SIGINT, shutting down gracefully"),
            _ = sigterm.recv() => info!("received SIGTERM, shutting down gracefully"),
        }
        let _ = shutdown_tx.send(true);
    });

    Ok(())
}

fn handle_config_command(
    config: SimulatorConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{}", toml::to_string_pretty(&config)?);
    }
    info!("configuration is valid");
    Ok(())
}
