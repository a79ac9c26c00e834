//! CoucheServe - Caching HTTP File Server
//!
//! Parses the command line, wires the backing store and cache actor
//! together, and serves HTTP requests until the process is stopped.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use coucheserve::config::CacheConfig;
use coucheserve::error::Result;
use coucheserve::server::run_file_server;
use coucheserve::store::FsBackingStore;
use coucheserve::CacheHandle;

// =============================================================================
// CLI Arguments
// =============================================================================

/// CoucheServe - caching HTTP file server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Number of bytes to allow in the cache
    #[arg(short = 'c', long, env = "CACHE_CAPACITY", default_value = "100000")]
    capacity: u64,

    /// Timeout (in seconds) to wait before returning an error for a read
    #[arg(short = 't', long, env = "READ_TIMEOUT_SECONDS", default_value = "2")]
    timeout_seconds: u64,

    /// The directory the files are hosted in
    #[arg(short = 'd', long, env = "ROOT_DIR", default_value = "public_html/")]
    root_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting CoucheServe");
    info!("  Port: {}", args.port);
    info!("  Cache capacity: {} bytes", args.capacity);
    info!("  Read timeout: {}s", args.timeout_seconds);
    info!("  Root directory: '{}'", args.root_dir.display());

    let config = CacheConfig {
        capacity: args.capacity,
        read_timeout: Duration::from_secs(args.timeout_seconds),
        root_dir: args.root_dir.clone(),
    };
    config.validate()?;

    let store = Arc::new(FsBackingStore::new(config.root_dir.clone()));
    let cache = CacheHandle::start(config, store);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    run_file_server(addr, cache).await
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("tower=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
