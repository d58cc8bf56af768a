//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - One request/response exchange per connection

mod pool;
mod server;
mod connection;
mod client;

pub use pool::{Job, WorkerPool};
pub use server::{Server, ShutdownHandle};
pub use connection::{handle_exchange, Connection, ExchangeOutcome};
pub use client::{is_exit_sentinel, Client, EXIT_SENTINEL};
