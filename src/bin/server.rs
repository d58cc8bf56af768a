//! calcnet Server Binary
//!
//! Starts the TCP server for calcnet.

use calcnet::config::{EndpointFile, DEFAULT_BIND_HOST, DEFAULT_ENDPOINT_FILE};
use calcnet::{Config, Server};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// calcnet Server
#[derive(Parser, Debug)]
#[command(name = "calcnet-server")]
#[command(about = "Remote arithmetic server")]
#[command(version)]
struct Args {
    /// Endpoint file (line 1: host, line 2: port)
    #[arg(short, long, default_value = DEFAULT_ENDPOINT_FILE)]
    config: String,

    /// Host to bind (all interfaces if omitted)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the endpoint file
    #[arg(short, long)]
    port: Option<u16>,

    /// Number of worker threads
    #[arg(short, long, default_value = "10")]
    workers: usize,

    /// Bound on queued connections (unbounded if omitted)
    #[arg(short, long)]
    queue_capacity: Option<usize>,

    /// Read timeout in milliseconds (0 disables)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 disables)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,calcnet=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("calcnet Server v{}", calcnet::VERSION);

    let host = args.host.unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
    let port = args
        .port
        .unwrap_or_else(|| EndpointFile::load(&args.config).server_port());

    // Build config from args
    let config = Config::builder()
        .host(host)
        .port(port)
        .pool_size(args.workers)
        .queue_capacity(args.queue_capacity)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
