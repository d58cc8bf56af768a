//! Evaluator
//!
//! Computes the result of a validated request in `f64` arithmetic.
//!
//! The only guarded case is a divisor exactly equal to zero (`0.0` or
//! `-0.0`). Every other IEEE 754 outcome, including `inf` and `NaN`, is an
//! ordinary success value.

use std::panic::{self, AssertUnwindSafe};

use crate::protocol::{decode_request, EvalError, EvalResult, Operation, Request};

/// Evaluate a validated request
pub fn evaluate(request: &Request) -> EvalResult {
    match apply(request.operation(), request.lhs(), request.rhs()) {
        Ok(value) => EvalResult::Success(value),
        Err(e) => EvalResult::ServerError(e),
    }
}

/// Apply an operation to two operands
pub fn apply(operation: Operation, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    match operation {
        Operation::Add => Ok(lhs + rhs),
        Operation::Sub => Ok(lhs - rhs),
        Operation::Mul => Ok(lhs * rhs),
        Operation::Div => {
            if rhs == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            Ok(lhs / rhs)
        }
    }
}

/// Decode and evaluate one request line
///
/// Never panics: a panic raised while handling the line is caught and
/// reported as [`EvalError::Internal`].
pub fn process_line(line: &str) -> EvalResult {
    process_with(line, |request| evaluate(&request))
}

/// Decode `line` and run `eval` on the result inside a panic boundary
pub fn process_with<F>(line: &str, eval: F) -> EvalResult
where
    F: FnOnce(Request) -> EvalResult,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match decode_request(line) {
        Ok(request) => eval(request),
        Err(e) => EvalResult::ClientError(e),
    }));

    outcome.unwrap_or_else(|_| {
        tracing::error!("Evaluation panicked for request {:?}", line);
        EvalResult::ServerError(EvalError::Internal)
    })
}
