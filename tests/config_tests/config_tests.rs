//! Tests for Config and the endpoint file
//!
//! These tests verify:
//! - Builder defaults and overrides
//! - Validation of pool settings
//! - Endpoint file fallbacks for server and client

use std::fs;

use calcnet::config::{
    Config, EndpointFile, CLIENT_FALLBACK_PORT, DEFAULT_BIND_HOST, DEFAULT_HOST, DEFAULT_PORT,
};
use calcnet::CalcError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_endpoint_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("server_info.dat");
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 5001);
    assert_eq!(config.pool_size, 10);
    assert_eq!(config.queue_capacity, None);
    assert_eq!(config.read_timeout_ms, 0);
    assert_eq!(config.write_timeout_ms, 0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_server_binds_all_interfaces_by_default() {
    let config = Config::default();
    assert_eq!(config.host, DEFAULT_BIND_HOST);
    assert_eq!(config.listen_addr(), "0.0.0.0:5001");

    // The host line of the endpoint file is for clients only
    let endpoint = EndpointFile::parse("10.0.0.7\n6000\n").unwrap();
    let config = Config::builder().port(endpoint.server_port()).build();
    assert_eq!(config.listen_addr(), "0.0.0.0:6000");
}

#[test]
fn test_config_builder() {
    let config = Config::builder()
        .host("127.0.0.1")
        .port(0)
        .pool_size(4)
        .queue_capacity(Some(16))
        .read_timeout_ms(250)
        .write_timeout_ms(500)
        .max_line_len(128)
        .build();

    assert_eq!(config.listen_addr(), "127.0.0.1:0");
    assert_eq!(config.pool_size, 4);
    assert_eq!(config.queue_capacity, Some(16));
    assert_eq!(config.read_timeout_ms, 250);
    assert_eq!(config.write_timeout_ms, 500);
    assert_eq!(config.max_line_len, 128);
}

#[test]
fn test_config_rejects_empty_pool() {
    let config = Config::builder().pool_size(0).build();
    assert!(matches!(config.validate(), Err(CalcError::Config(_))));
}

#[test]
fn test_config_rejects_zero_queue() {
    let config = Config::builder().queue_capacity(Some(0)).build();
    assert!(matches!(config.validate(), Err(CalcError::Config(_))));
}

// =============================================================================
// Endpoint File Tests
// =============================================================================

#[test]
fn test_endpoint_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let endpoint = EndpointFile::load(temp_dir.path().join("does_not_exist.dat"));

    assert_eq!(endpoint, EndpointFile::default());
    assert_eq!(endpoint.server_port(), DEFAULT_PORT);
    assert_eq!(endpoint.client_endpoint(), (DEFAULT_HOST.to_string(), DEFAULT_PORT));
}

#[test]
fn test_endpoint_file_valid() {
    let (_dir, path) = write_endpoint_file("10.0.0.7\n6000\n");
    let endpoint = EndpointFile::load(&path);

    assert_eq!(endpoint.server_port(), 6000);
    assert_eq!(endpoint.client_endpoint(), ("10.0.0.7".to_string(), 6000));
}

#[test]
fn test_endpoint_file_trims_lines() {
    let (_dir, path) = write_endpoint_file("  example.org \r\n 7000 \r\n");
    let endpoint = EndpointFile::load(&path);

    assert_eq!(endpoint.host, "example.org");
    assert_eq!(endpoint.port, "7000");
}

#[test]
fn test_endpoint_file_single_line_falls_back() {
    let (_dir, path) = write_endpoint_file("10.0.0.7\n");
    let endpoint = EndpointFile::load(&path);

    assert_eq!(endpoint, EndpointFile::default());
}

#[test]
fn test_endpoint_file_empty_falls_back() {
    let (_dir, path) = write_endpoint_file("");
    assert_eq!(EndpointFile::load(&path), EndpointFile::default());
}

#[test]
fn test_bad_port_server_falls_back_to_default_port() {
    let (_dir, path) = write_endpoint_file("10.0.0.7\nnot-a-port\n");
    let endpoint = EndpointFile::load(&path);

    assert_eq!(endpoint.server_port(), DEFAULT_PORT);
}

#[test]
fn test_bad_port_client_keeps_host() {
    let (_dir, path) = write_endpoint_file("10.0.0.7\n99999\n");
    let endpoint = EndpointFile::load(&path);

    assert_eq!(
        endpoint.client_endpoint(),
        ("10.0.0.7".to_string(), CLIENT_FALLBACK_PORT)
    );
    assert_eq!(CLIENT_FALLBACK_PORT, 1234);
}

#[test]
fn test_empty_host_line() {
    let endpoint = EndpointFile::parse("\n6000\n").unwrap();

    assert_eq!(endpoint.server_port(), 6000);
    assert_eq!(endpoint.client_endpoint(), (DEFAULT_HOST.to_string(), 6000));
}

#[test]
fn test_extra_lines_ignored() {
    let endpoint = EndpointFile::parse("host\n1\ntrailing\n").unwrap();
    assert_eq!(endpoint.server_port(), 1);
    assert_eq!(endpoint.client_endpoint(), ("host".to_string(), 1));
}
