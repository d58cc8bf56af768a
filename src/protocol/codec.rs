//! Protocol codec
//!
//! Parsing and formatting functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! <COMMAND> <OPERAND1> <OPERAND2>\n
//! ```
//! Tokens are separated by runs of whitespace; leading and trailing
//! whitespace is ignored.
//!
//! ### Response
//! ```text
//! <STATUS> <PAYLOAD>\n
//! ```

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::error::{CalcError, Result};
use super::{EvalResult, Operation, Reply, Request, Response};

/// Number of tokens in a well-formed request
pub const REQUEST_TOKENS: usize = 3;

/// Reasons a request line is rejected (400 class)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected 3 tokens, got {0}")]
    InvalidArgumentCount(usize),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("operand is not a number: {0}")]
    BadOperand(String),

    #[error("line longer than {0} bytes")]
    LineTooLong(usize),
}

impl DecodeError {
    /// Tag written after the status code
    pub fn tag(&self) -> &'static str {
        match self {
            DecodeError::InvalidArgumentCount(_) | DecodeError::LineTooLong(_) => {
                "INVALID_ARGUMENTS"
            }
            DecodeError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            DecodeError::BadOperand(_) => "BAD_OPERAND",
        }
    }
}

// =============================================================================
// Request Decoding
// =============================================================================

/// Decode a request line
///
/// Checks run in order: token count, operands, command. A line with both a
/// bad operand and an unknown command is a `BadOperand`.
pub fn decode_request(line: &str) -> std::result::Result<Request, DecodeError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != REQUEST_TOKENS {
        return Err(DecodeError::InvalidArgumentCount(tokens.len()));
    }

    let lhs = parse_operand(tokens[1])?;
    let rhs = parse_operand(tokens[2])?;
    let operation: Operation = tokens[0].parse()?;

    Ok(Request::new(operation, lhs, rhs))
}

fn parse_operand(token: &str) -> std::result::Result<f64, DecodeError> {
    token
        .parse::<f64>()
        .map_err(|_| DecodeError::BadOperand(token.to_string()))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode an evaluation outcome as a response line (without the newline)
pub fn encode_response(result: &EvalResult) -> String {
    Response::from(result).to_string()
}

/// Interpret a response line on the client side
///
/// `None` means the connection closed before a line arrived.
pub fn decode_response(line: Option<&str>) -> Reply {
    let Some(line) = line else {
        return Reply::NoResponse;
    };

    let (status, data) = match line.split_once(char::is_whitespace) {
        Some((status, data)) => (status, data),
        None => (line, ""),
    };

    match status {
        "200" => Reply::Answer(data.to_string()),
        "400" => Reply::ClientError(data.to_string()),
        "500" => Reply::ServerError(data.to_string()),
        _ => Reply::Unknown(line.to_string()),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one line from a stream
///
/// Returns `None` on end-of-stream before any byte. The trailing `\n` (and
/// `\r`) is stripped. Invalid UTF-8 is replaced rather than rejected, so the
/// request is still answered.
///
/// A line longer than `max_len` bytes is consumed up to its newline and
/// reported as [`CalcError::LineTooLong`]; none of it is returned. At most
/// `max_len + 1` bytes are held in memory whatever the peer sends.
pub fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let mut line_len = 0usize;
    let mut read_any = false;

    loop {
        let (used, done) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                break;
            }

            let (content, used, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..i], i + 1, true),
                None => (available, available.len(), false),
            };

            // One byte past the limit so a trailing '\r' can still be dropped
            let room = (max_len + 1).saturating_sub(buf.len());
            buf.extend_from_slice(&content[..content.len().min(room)]);
            line_len += content.len();
            (used, done)
        };

        reader.consume(used);
        read_any = true;
        if done {
            break;
        }
    }

    if !read_any {
        return Ok(None);
    }

    if line_len == buf.len() && buf.last() == Some(&b'\r') {
        buf.pop();
        line_len -= 1;
    }
    if line_len > max_len {
        return Err(CalcError::LineTooLong { limit: max_len });
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Write one line to a stream and flush it
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a response line to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_line(writer, &response.to_string())
}

/// Read a response line from a stream and interpret it
pub fn read_reply<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Reply> {
    let line = read_line(reader, max_len)?;
    Ok(decode_response(line.as_deref()))
}
