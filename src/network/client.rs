//! Client Session
//!
//! One TCP connection, strictly one outstanding request at a time.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use crate::error::Result;
use crate::protocol::{read_reply, write_line, Reply};

/// Typed at the prompt to end the session without sending anything
pub const EXIT_SENTINEL: &str = "exit";

/// Longest response line read, in bytes
const MAX_REPLY_LEN: usize = 4096;

/// True if `line` is the exit sentinel (trimmed, case-insensitive)
pub fn is_exit_sentinel(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_SENTINEL)
}

/// A connected client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    server_addr: String,
}

impl Client {
    /// Connect to a server
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;

        let server_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| format!("{}:{}", host, port));

        tracing::debug!("Connected to {}", server_addr);

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
            server_addr,
        })
    }

    /// Send one line verbatim and wait for its response line
    ///
    /// Returns [`Reply::NoResponse`] if the server closed the connection
    /// without answering.
    pub fn request(&mut self, line: &str) -> Result<Reply> {
        write_line(&mut self.writer, line)?;
        read_reply(&mut self.reader, MAX_REPLY_LEN)
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }
}
