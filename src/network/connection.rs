//! Connection Handler
//!
//! Handles exactly one request/response exchange on an accepted connection.
//!
//! ## States
//! ```text
//! Idle → ReadingRequest → Processing → WritingResponse → Closed
//!              │
//!              └── EOF / read fault ──────────────────→ Closed (silent)
//! ```

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{CalcError, Result};
use crate::evaluator::process_line;
use crate::protocol::{read_line, write_response, DecodeError, EvalResult, Response};

/// How an exchange ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A request was read and this response was written
    Answered(Response),

    /// The peer closed before sending a request line
    Closed,
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Longest request line read, in bytes
    max_line_len: usize,
}

impl Connection {
    /// Wrap an accepted stream
    ///
    /// The stream is cloned once so reads and writes get their own buffers.
    /// Both halves share one socket, so options set here apply to both.
    pub fn new(stream: TcpStream, max_line_len: usize) -> Result<Self> {
        stream.set_nodelay(true)?;

        let peer_addr = match stream.peer_addr() {
            Ok(addr) => addr.to_string(),
            Err(_) => String::from("unknown"),
        };

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
            peer_addr,
            max_line_len,
        })
    }

    /// Bound how long one read or one write may block
    ///
    /// A value of 0 means no limit in that direction.
    pub fn set_timeouts(&self, read_ms: u64, write_ms: u64) -> Result<()> {
        let socket = self.reader.get_ref();
        socket.set_read_timeout(millis(read_ms))?;
        socket.set_write_timeout(millis(write_ms))?;
        Ok(())
    }

    /// Run the exchange, then close the socket
    ///
    /// Consumes the connection: both stream handles are dropped on every
    /// exit path.
    pub fn handle(mut self) -> Result<ExchangeOutcome> {
        handle_exchange(
            &mut self.reader,
            &mut self.writer,
            &self.peer_addr,
            self.max_line_len,
        )
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Read one request, answer it, and report what happened
///
/// - EOF or a read fault before a line: nothing is written, `Closed`
/// - Any decodable or undecodable line: exactly one response line
/// - A line over `max_line_len`: drained and answered `400 INVALID_ARGUMENTS`
/// - Write fault: returned as an error, never retried
pub fn handle_exchange<R, W>(
    reader: &mut R,
    writer: &mut W,
    peer: &str,
    max_line_len: usize,
) -> Result<ExchangeOutcome>
where
    R: BufRead,
    W: Write,
{
    let result = match read_line(reader, max_line_len) {
        Ok(Some(line)) => {
            tracing::debug!("Request from {}: {:?}", peer, line);
            process_line(&line)
        }
        Ok(None) => {
            tracing::debug!("Client {} closed without a request", peer);
            return Ok(ExchangeOutcome::Closed);
        }
        Err(CalcError::LineTooLong { limit }) => {
            tracing::debug!("Request from {} is longer than {} bytes", peer, limit);
            EvalResult::ClientError(DecodeError::LineTooLong(limit))
        }
        Err(CalcError::Io(ref e)) if is_disconnect(e) => {
            tracing::debug!("Client {} went away before sending a request: {}", peer, e);
            return Ok(ExchangeOutcome::Closed);
        }
        Err(e) => {
            tracing::warn!("Error reading from {}: {}", peer, e);
            return Ok(ExchangeOutcome::Closed);
        }
    };

    let response = Response::from(&result);

    if let Err(e) = write_response(writer, &response) {
        tracing::warn!("Error writing {} to {}: {}", response, peer, e);
        return Err(e);
    }

    tracing::debug!("Response to {}: {}", peer, response);

    Ok(ExchangeOutcome::Answered(response))
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Read faults that only mean the peer is gone or idle
fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
