//! # calcnet
//!
//! A line-oriented request/response protocol for remote arithmetic:
//! - One request line and one response line per connection
//! - Coded responses (`200`, `400`, `500`) instead of dropped connections
//! - Single accept thread feeding a fixed-size worker pool
//! - Interactive TCP client
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                (single accept thread)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ dispatch
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Worker Pool                                │
//! │          (N threads, crossbeam submission queue)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌──────────────┐
//!               │  Connection  │  read line → decode → evaluate
//!               │   Handler    │  → encode → write line → close
//!               └──────┬───────┘
//!                      │
//!          ┌───────────┴────────────┐
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │  Evaluator  │
//!   │   Codec     │          │   (f64)     │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod evaluator;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CalcError, Result};
pub use config::Config;
pub use network::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of calcnet
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
