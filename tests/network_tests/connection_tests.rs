//! Tests for the connection handler state machine
//!
//! Drives `handle_exchange` with in-memory buffers.

use std::io::{self, BufReader, Cursor, Read, Write};

use calcnet::network::{handle_exchange, ExchangeOutcome};
use calcnet::protocol::{Response, StatusCode};
use calcnet::CalcError;

const MAX_LINE: usize = 4096;

// =============================================================================
// Helper Functions
// =============================================================================

fn exchange(input: &[u8]) -> (ExchangeOutcome, String) {
    let mut reader = Cursor::new(input.to_vec());
    let mut output = Vec::new();
    let outcome = handle_exchange(&mut reader, &mut output, "test-peer", MAX_LINE).unwrap();
    (outcome, String::from_utf8(output).unwrap())
}

/// Writer whose every write fails
struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader whose every read fails
struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
    }
}

// =============================================================================
// Exchange Tests
// =============================================================================

#[test]
fn test_success_exchange() {
    let (outcome, written) = exchange(b"ADD 10 20\n");
    assert_eq!(written, "200 30.0\n");
    assert_eq!(outcome, ExchangeOutcome::Answered(Response::success(30.0)));
}

#[test]
fn test_error_exchanges_write_one_line() {
    let cases: [(&[u8], &str); 4] = [
        (b"DIV 5 0\n", "500 DIVIDE_BY_ZERO\n"),
        (b"FOO 1 2\n", "400 UNKNOWN_COMMAND\n"),
        (b"ADD 1\n", "400 INVALID_ARGUMENTS\n"),
        (b"MUL x 2\n", "400 BAD_OPERAND\n"),
    ];

    for (input, expected) in cases {
        let (outcome, written) = exchange(input);
        assert_eq!(written, expected);
        assert!(matches!(outcome, ExchangeOutcome::Answered(_)));
    }
}

#[test]
fn test_only_first_line_is_answered() {
    let (_, written) = exchange(b"ADD 1 1\nADD 2 2\n");
    assert_eq!(written, "200 2.0\n");
}

#[test]
fn test_blank_line_is_answered() {
    let (outcome, written) = exchange(b"\n");
    assert_eq!(written, "400 INVALID_ARGUMENTS\n");
    match outcome {
        ExchangeOutcome::Answered(response) => {
            assert_eq!(response.status, StatusCode::ClientError)
        }
        other => panic!("Expected an answer, got {:?}", other),
    }
}

#[test]
fn test_eof_closes_silently() {
    let (outcome, written) = exchange(b"");
    assert_eq!(outcome, ExchangeOutcome::Closed);
    assert!(written.is_empty());
}

#[test]
fn test_read_fault_closes_silently() {
    let mut reader = BufReader::new(FailingReader);
    let mut output = Vec::new();
    let outcome = handle_exchange(&mut reader, &mut output, "test-peer", MAX_LINE).unwrap();

    assert_eq!(outcome, ExchangeOutcome::Closed);
    assert!(output.is_empty());
}

#[test]
fn test_write_fault_is_reported() {
    let mut reader = Cursor::new(b"ADD 1 2\n".to_vec());
    let result = handle_exchange(&mut reader, &mut BrokenWriter, "test-peer", MAX_LINE);
    assert!(matches!(result, Err(CalcError::Io(_))));
}

#[test]
fn test_binary_garbage_is_answered() {
    let (_, written) = exchange(&[0xFF, 0xFE, b' ', b'1', b' ', b'2', b'\n']);
    assert_eq!(written, "400 UNKNOWN_COMMAND\n");
}

#[test]
fn test_overlong_line_is_rejected() {
    // A valid request prefix followed by padding and a fourth token
    let mut input = b"ADD 1 2".to_vec();
    input.extend(std::iter::repeat(b' ').take(100));
    input.extend_from_slice(b"3\n");

    let mut reader = Cursor::new(input);
    let mut output = Vec::new();
    let outcome = handle_exchange(&mut reader, &mut output, "test-peer", 8).unwrap();

    assert_eq!(output, b"400 INVALID_ARGUMENTS\n");
    match outcome {
        ExchangeOutcome::Answered(response) => {
            assert_eq!(response.status, StatusCode::ClientError)
        }
        other => panic!("Expected an answer, got {:?}", other),
    }
}

#[test]
fn test_overlong_digits_are_not_evaluated() {
    let mut input = b"ADD 1 2".to_vec();
    input.extend(std::iter::repeat(b'9').take(100));
    input.push(b'\n');

    let mut reader = Cursor::new(input);
    let mut output = Vec::new();
    handle_exchange(&mut reader, &mut output, "test-peer", 8).unwrap();

    assert_eq!(output, b"400 INVALID_ARGUMENTS\n");
}

#[test]
fn test_operand_error_reported_before_command_error() {
    let (_, written) = exchange(b"FOO x 2\n");
    assert_eq!(written, "400 BAD_OPERAND\n");
}
