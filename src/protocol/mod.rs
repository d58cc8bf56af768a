//! Protocol Module
//!
//! Defines the line-oriented wire protocol for client-server communication.
//! Pure parsing and formatting; the only I/O is in the stream helpers.
//!
//! ## Protocol Format
//!
//! One request line and one response line per connection, newline
//! terminated.
//!
//! ### Request
//! ```text
//! <COMMAND> <OPERAND1> <OPERAND2>
//! ```
//!
//! ### Commands (case-insensitive)
//! - ADD: operand1 + operand2
//! - SUB: operand1 - operand2
//! - MUL: operand1 * operand2
//! - DIV: operand1 / operand2
//!
//! ### Response
//! ```text
//! <STATUS> <PAYLOAD>
//! ```
//!
//! ### Status Codes
//! - 200: result                 (`200 30.0`)
//! - 400: INVALID_ARGUMENTS | UNKNOWN_COMMAND | BAD_OPERAND
//! - 500: DIVIDE_BY_ZERO | SERVER_ERROR

mod command;
mod response;
mod codec;

pub use command::{Operation, Request};
pub use response::{format_number, EvalError, EvalResult, Reply, Response, StatusCode};
pub use codec::{
    decode_request, encode_response, decode_response,
    read_line, write_line, read_reply, write_response,
    DecodeError, REQUEST_TOKENS,
};
