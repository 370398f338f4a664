/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for bybit-basic-adapter tests

use bybit_basic_adapter::{BybitClient, ClientConfig, Credentials};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Fixed API key pair for testing
pub fn test_credentials() -> Credentials {
    Credentials::new("test-api-key", "test-api-secret")
}

/// Client pointed at the mock server with test credentials
pub fn signed_client(server: &MockServer) -> BybitClient {
    BybitClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
        .with_credentials(test_credentials())
}

/// Wrap a result payload in the V5 response envelope
pub fn envelope(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": result,
        "retExtInfo": {},
        "time": 1_700_000_000_000i64,
    })
}

/// Error envelope with an empty result
pub fn error_envelope(code: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "retCode": code,
        "retMsg": message,
        "result": {},
        "retExtInfo": {},
        "time": 1_700_000_000_000i64,
    })
}
