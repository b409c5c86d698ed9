//! opine-server entry point
//!
//! Usage:
//!   opine-server                      # Listen on 127.0.0.1:3030
//!   opine-server --debug              # Debug logging to console
//!   RUST_LOG=opine_server=debug ...   # Fine-grained log control

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use opine_server::{default_db_path, serve, ServerConfig};

/// Server command-line arguments
#[derive(Parser, Debug)]
#[command(name = "opine-server", version, about = "Business review site with owner dashboards")]
struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3030")]
    port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Database file path (default: ~/.opine/opine.db, or $OPINE_DB)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let filter = if debug {
        // Debug mode: set debug level unless RUST_LOG is explicitly set
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.debug)?;

    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
        db_path: args.db_path.unwrap_or_else(default_db_path),
        timeout_secs: args.timeout,
    };

    serve(config).await
}
