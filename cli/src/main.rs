//! Medical equipment portal CLI server
//!
//! ```sh
//! # Run with default config (~/.config/medequip-portal/config.toml)
//! medequip-portal
//!
//! # Custom config path
//! medequip-portal --config /etc/medequip/config.toml
//!
//! # Merge import_1..N into the equipment table and exit
//! medequip-portal --run-import
//!
//! # Validate config without starting
//! medequip-portal --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use medequip::config::AppConfig;
use medequip::server::{init_tracing, run_import_once, ServerHandle};

/// Asset registry, repair intake and file library for a medical equipment department.
#[derive(Parser, Debug)]
#[command(
    name = "medequip-portal",
    version,
    about = "Medical equipment department portal",
    long_about = "REST API server for the hospital medical-equipment portal.\n\n\
                  Default config: ~/.config/medequip-portal/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "MEDEQUIP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Run the import reconciler once and exit.
    #[arg(long)]
    run_import: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(medequip::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);
    info!("Configuration: {}", config_path.display());

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.listen_address());
        println!("   Data dir    : {}", config.storage.data_dir.display());
        println!("   Import dir  : {}", config.import.source_dir.display());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── One-shot import ────────────────────────────────────────
    if cli.run_import {
        return match run_import_once(&config).await {
            Ok(outcome) => {
                println!("Imported {} rows from {:?}", outcome.rows, outcome.sources);
                Ok(())
            }
            Err(e) => {
                error!("Import failed: {}", e);
                Err(e.into())
            }
        };
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
