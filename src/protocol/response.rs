//! Response definitions
//!
//! Status codes, evaluation outcomes and the client-side view of a
//! response line.

use std::fmt;

use thiserror::Error;

use super::DecodeError;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    Success = 200,
    ClientError = 400,
    ServerError = 500,
}

impl StatusCode {
    /// Numeric code as written on the wire
    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Success),
            400 => Some(StatusCode::ClientError),
            500 => Some(StatusCode::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Server-side evaluation failures (500 class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivideByZero,

    #[error("internal evaluation fault")]
    Internal,
}

impl EvalError {
    /// Tag written after the status code
    pub fn tag(&self) -> &'static str {
        match self {
            EvalError::DivideByZero => "DIVIDE_BY_ZERO",
            EvalError::Internal => "SERVER_ERROR",
        }
    }
}

/// Outcome of handling one request line
#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult {
    Success(f64),
    ClientError(DecodeError),
    ServerError(EvalError),
}

impl EvalResult {
    pub fn status(&self) -> StatusCode {
        match self {
            EvalResult::Success(_) => StatusCode::Success,
            EvalResult::ClientError(_) => StatusCode::ClientError,
            EvalResult::ServerError(_) => StatusCode::ServerError,
        }
    }
}

impl From<DecodeError> for EvalResult {
    fn from(err: DecodeError) -> Self {
        EvalResult::ClientError(err)
    }
}

impl From<EvalError> for EvalResult {
    fn from(err: EvalError) -> Self {
        EvalResult::ServerError(err)
    }
}

/// A response to send to the client
///
/// Exactly one status per response. The payload is the formatted result
/// for `200` and an error tag for `400`/`500`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: StatusCode,

    /// Result or error tag
    pub payload: String,
}

impl Response {
    /// Create a success response carrying a numeric result
    pub fn success(value: f64) -> Self {
        Self {
            status: StatusCode::Success,
            payload: format_number(value),
        }
    }

    /// Create a 400 response for a rejected request
    pub fn client_error(err: &DecodeError) -> Self {
        Self {
            status: StatusCode::ClientError,
            payload: err.tag().to_string(),
        }
    }

    /// Create a 500 response for a failed evaluation
    pub fn server_error(err: EvalError) -> Self {
        Self {
            status: StatusCode::ServerError,
            payload: err.tag().to_string(),
        }
    }
}

impl From<&EvalResult> for Response {
    fn from(result: &EvalResult) -> Self {
        match result {
            EvalResult::Success(value) => Response::success(*value),
            EvalResult::ClientError(err) => Response::client_error(err),
            EvalResult::ServerError(err) => Response::server_error(*err),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.payload)
    }
}

/// Shortest decimal form that parses back to the same `f64`
///
/// Integral values keep a trailing `.0` (`30.0`), large and tiny magnitudes
/// switch to exponent form (`1e300`), non-finite values print as `inf`,
/// `-inf` and `NaN`.
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

// =============================================================================
// Client-side view
// =============================================================================

/// A response line as interpreted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `200 <data>`
    Answer(String),

    /// `400 <tag>`
    ClientError(String),

    /// `500 <tag>`
    ServerError(String),

    /// Any other status; carries the raw line
    Unknown(String),

    /// The connection closed before a line arrived
    NoResponse,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Answer(data) => write!(f, "Answer: {}", data),
            Reply::ClientError(tag) => write!(f, "Error: bad request ({})", tag),
            Reply::ServerError(tag) => write!(f, "Error: server failed to compute ({})", tag),
            Reply::Unknown(raw) => write!(f, "Error: unknown response ({})", raw),
            Reply::NoResponse => f.write_str("No response from server."),
        }
    }
}
