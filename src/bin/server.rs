//! # Steganography Server Entry Point
//!
//! Thin wrapper that loads the configuration and serves the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin steg-server -- --config config/server.toml
//! ```

use clap::Parser;
use log::info;
use std::sync::Arc;

use token_steg::common::config::AppConfig;
use token_steg::common::logging::init_logger;
use token_steg::server::{router, AppState};

/// Command-line arguments for the server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the server configuration file (TOML format)
    ///
    /// Example: config/server.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen address from the configuration
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }

    init_logger(config.logging.level_filter());

    let state = Arc::new(AppState::new());
    let app = router(state, config.server.max_upload_bytes);

    let addr = config.server.address.as_str();
    info!("🌐 Steganography server running on http://{}", addr);
    info!("📡 API endpoints: http://{}/steganography/{{hide,reveal,capacity}}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
