//! Error types for calcnet
//!
//! Provides a unified error type for server, pool and client operations.
//! Client-input and evaluation faults live in [`crate::protocol`] and
//! [`crate::evaluator`]; they are answered on the wire, never propagated.

use std::net::SocketAddr;

use thiserror::Error;

/// Result type alias using CalcError
pub type Result<T> = std::result::Result<T, CalcError>;

/// Unified error type for calcnet operations
#[derive(Debug, Error)]
pub enum CalcError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Accept loop on {addr} failed: {source}")]
    Accept {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Worker Pool Errors
    // -------------------------------------------------------------------------
    #[error("Worker pool error: {0}")]
    Pool(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
