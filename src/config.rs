//! Configuration for calcnet
//!
//! Centralized configuration with sensible defaults, plus the two-line
//! endpoint file shared by the server and the client.

use std::fs;
use std::path::Path;

use crate::error::{CalcError, Result};

/// Host the client uses when the endpoint file is missing or malformed
pub const DEFAULT_HOST: &str = "localhost";

/// Address the server binds unless told otherwise (all interfaces)
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Port used when the endpoint file is missing or malformed
pub const DEFAULT_PORT: u16 = 5001;

/// Port the client falls back to when only the port line is malformed
pub const CLIENT_FALLBACK_PORT: u16 = 1234;

/// Default location of the endpoint file
pub const DEFAULT_ENDPOINT_FILE: &str = "server_info.dat";

/// Main configuration for a calcnet server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host to bind
    pub host: String,

    /// TCP port to bind (0 picks an ephemeral port)
    pub port: u16,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    /// Longest request line accepted, in bytes; longer lines get a 400
    pub max_line_len: usize,

    // -------------------------------------------------------------------------
    // Worker Pool Configuration
    // -------------------------------------------------------------------------
    /// Number of worker threads servicing connections
    pub pool_size: usize,

    /// Submission queue capacity (`None` = unbounded)
    pub queue_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            max_line_len: 4096,
            pool_size: 10,
            queue_capacity: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string used for binding and logging
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(CalcError::Config("pool_size must be at least 1".to_string()));
        }
        if self.queue_capacity == Some(0) {
            return Err(CalcError::Config(
                "queue_capacity must be at least 1 when bounded".to_string(),
            ));
        }
        if self.max_line_len == 0 {
            return Err(CalcError::Config("max_line_len must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the host to bind
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port to bind
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the number of worker threads
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Bound the submission queue (`None` = unbounded)
    pub fn queue_capacity(mut self, capacity: Option<usize>) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the maximum request line length (in bytes)
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

// =============================================================================
// Endpoint File
// =============================================================================

/// Raw contents of the endpoint file
///
/// ```text
/// line 1: host
/// line 2: port
/// ```
///
/// Loading never fails; a missing, unreadable or short file yields the
/// `localhost` / `5001` defaults. The port stays a string until one side
/// resolves it, since server and client recover from a bad port differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFile {
    pub host: String,
    pub port: String,
}

impl Default for EndpointFile {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
        }
    }
}

impl EndpointFile {
    /// Load the endpoint file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Some(endpoint) => {
                    tracing::info!("Loaded endpoint from {}", path.display());
                    endpoint
                }
                None => {
                    tracing::warn!(
                        "Malformed endpoint file {}, using {}:{}",
                        path.display(),
                        DEFAULT_HOST,
                        DEFAULT_PORT
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::info!(
                    "Cannot read endpoint file {} ({}), using {}:{}",
                    path.display(),
                    e,
                    DEFAULT_HOST,
                    DEFAULT_PORT
                );
                Self::default()
            }
        }
    }

    /// Parse the first two lines; `None` if either is missing
    pub fn parse(contents: &str) -> Option<Self> {
        let mut lines = contents.lines();
        let host = lines.next()?.trim().to_string();
        let port = lines.next()?.trim().to_string();
        Some(Self { host, port })
    }

    /// Port the server listens on
    ///
    /// The host line is for clients only; the server binds
    /// [`DEFAULT_BIND_HOST`] unless overridden. A bad port resolves to
    /// [`DEFAULT_PORT`].
    pub fn server_port(&self) -> u16 {
        self.port.parse::<u16>().unwrap_or_else(|_| {
            tracing::warn!("Invalid port {:?}, using {}", self.port, DEFAULT_PORT);
            DEFAULT_PORT
        })
    }

    /// Endpoint the client connects to
    ///
    /// Only the port falls back here; the host line is kept.
    pub fn client_endpoint(&self) -> (String, u16) {
        let host = if self.host.is_empty() {
            DEFAULT_HOST.to_string()
        } else {
            self.host.clone()
        };
        let port = self.port.parse::<u16>().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid port {:?}, using {}",
                self.port,
                CLIENT_FALLBACK_PORT
            );
            CLIENT_FALLBACK_PORT
        });
        (host, port)
    }
}
