//! calcnet CLI Client
//!
//! Interactive prompt that sends arithmetic requests to a calcnet server.

use std::io::{self, BufRead, Write};

use calcnet::config::{EndpointFile, DEFAULT_ENDPOINT_FILE};
use calcnet::network::{is_exit_sentinel, Client};
use calcnet::protocol::Reply;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// calcnet CLI
#[derive(Parser, Debug)]
#[command(name = "calcnet-cli")]
#[command(about = "Interactive client for the calcnet arithmetic server")]
#[command(version)]
struct Args {
    /// Endpoint file (line 1: host, line 2: port)
    #[arg(short, long, default_value = DEFAULT_ENDPOINT_FILE)]
    config: String,

    /// Server host, overriding the endpoint file
    #[arg(long)]
    host: Option<String>,

    /// Server port, overriding the endpoint file
    #[arg(short, long)]
    port: Option<u16>,

    /// Open a fresh connection for every request
    #[arg(short, long)]
    reconnect: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    let (file_host, file_port) = EndpointFile::load(&args.config).client_endpoint();
    let host = args.host.unwrap_or(file_host);
    let port = args.port.unwrap_or(file_port);

    println!("Connecting to {}:{}...", host, port);

    if let Err(e) = run_session(&host, port, args.reconnect) {
        eprintln!("Client error: {}", e);
        std::process::exit(1);
    }
}

fn run_session(host: &str, port: u16, reconnect: bool) -> calcnet::Result<()> {
    let mut client = Some(Client::connect(host, port)?);

    println!("Connected.");
    println!("Enter an expression (e.g. ADD 10 20), or 'exit' to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if is_exit_sentinel(&line) {
            break;
        }

        let mut session = match client.take() {
            Some(c) => c,
            None => Client::connect(host, port)?,
        };

        let reply = session.request(&line)?;
        println!("{}", reply);

        if reconnect {
            continue;
        }
        if reply == Reply::NoResponse {
            // The server closed this connection; nothing more can be sent on it
            break;
        }
        client = Some(session);
    }

    println!("Closing connection.");
    Ok(())
}
