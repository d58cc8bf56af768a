//! TCP Server
//!
//! Accepts connections and dispatches them to the worker pool.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{CalcError, Result};
use super::connection::{Connection, ExchangeOutcome};
use super::pool::WorkerPool;

/// TCP server for calcnet
///
/// ## Lifecycle
/// ```text
/// Unbound ──bind──→ Listening ──run──→ Accepting (loop) ──→ Stopped
/// ```
/// `bind` fails fast if the port is taken. `run` only returns after a fatal
/// listener fault or a shutdown request, and in both cases the worker pool
/// is drained first.
pub struct Server {
    config: Config,
    listener: TcpListener,
    local_addr: SocketAddr,
    pool: WorkerPool,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the configured endpoint and start the worker pool
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let addr = config.listen_addr();
        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .map_err(|source| CalcError::Bind { addr: addr.clone(), source })?;
        let local_addr = listener.local_addr()?;

        let pool = WorkerPool::new(config.pool_size, config.queue_capacity)?;

        tracing::info!(
            "Bound {} ({}), {} workers",
            addr,
            local_addr,
            config.pool_size
        );

        Ok(Self {
            config,
            listener,
            local_addr,
            pool,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops the accept loop from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr,
        }
    }

    /// Accept connections until shutdown or a fatal listener fault (blocking)
    pub fn run(self) -> Result<()> {
        let Server {
            config,
            listener,
            local_addr,
            pool,
            shutdown,
        } = self;

        tracing::info!("Server is listening on {}", local_addr);

        let result = loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if shutdown.load(Ordering::Acquire) {
                        break Ok(());
                    }

                    tracing::debug!("New connection from {}", peer);

                    let (read_ms, write_ms) = (config.read_timeout_ms, config.write_timeout_ms);
                    let max_line_len = config.max_line_len;
                    if let Err(e) =
                        pool.execute(move || serve(stream, read_ms, write_ms, max_line_len))
                    {
                        tracing::error!("Failed to dispatch connection from {}: {}", peer, e);
                        break Err(e);
                    }
                }
                Err(_) if shutdown.load(Ordering::Acquire) => break Ok(()),
                Err(e) if is_transient(&e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                }
                Err(e) => {
                    tracing::error!("Listener on {} failed: {}", local_addr, e);
                    break Err(CalcError::Accept {
                        addr: local_addr,
                        source: e,
                    });
                }
            }
        };

        drop(listener);
        tracing::info!("Accept loop stopped, waiting for in-flight connections");
        pool.shutdown();
        tracing::info!("Server stopped");

        result
    }
}

/// Stops a running [`Server`]
///
/// Sets the stop flag, then opens a throwaway connection so a blocked
/// `accept` returns and observes it.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if self.flag.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            wake.set_ip(match wake.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            });
        }

        if let Err(e) = TcpStream::connect(wake) {
            tracing::debug!("Wake-up connection to {} failed: {}", wake, e);
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Worker-side body for one accepted connection
///
/// Every fault stops here; nothing reaches the accept loop or other workers.
fn serve(stream: TcpStream, read_ms: u64, write_ms: u64, max_line_len: usize) {
    let connection = match Connection::new(stream, max_line_len) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to set up connection: {}", e);
            return;
        }
    };

    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
        return;
    }

    let peer = connection.peer_addr().to_string();
    match connection.handle() {
        Ok(ExchangeOutcome::Answered(_)) | Ok(ExchangeOutcome::Closed) => {
            tracing::trace!("Connection {} closed", peer);
        }
        Err(e) => {
            tracing::debug!("Connection {} abandoned: {}", peer, e);
        }
    }
}

/// Accept errors that concern one pending connection, not the listener
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
