mod api;
mod app_system;
mod clients;
mod domain;
mod error;
mod messages;
mod server;
mod store;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tracing::info;

use crate::app_system::{setup_tracing, ApiSystem};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing once for the entire application
    setup_tracing();

    let args = Args::parse();

    info!("Starting user api");

    let system = ApiSystem::new();
    let server = server::start(&args.host, args.port, system.store_client.clone()).await?;

    info!(addr = %server.addr(), "User api running");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    server.stop();
    system.shutdown().await?;

    info!("User api stopped");
    Ok(())
}
