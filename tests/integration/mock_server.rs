//! Mock HTTP server setup for integration tests
#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use truelist::resilience::rate_limiter::RateLimiterConfig;
use truelist::{TruelistClient, TruelistClientBuilder};

pub const TEST_API_KEY: &str = "tk_test_123";
pub const VERIFY_PATH: &str = "/api/v1/verify";
pub const ACCOUNT_PATH: &str = "/api/v1/account";

/// Test fixture that owns a mock Truelist service
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server with the default limiter
    pub fn client(&self) -> TruelistClient {
        TruelistClientBuilder::new(TEST_API_KEY)
            .base_url(&self.base_url)
            .build()
            .expect("client should build")
    }

    pub fn client_with_limiter(&self, cfg: RateLimiterConfig) -> TruelistClient {
        TruelistClientBuilder::new(TEST_API_KEY)
            .base_url(&self.base_url)
            .rate_limit_config(cfg)
            .build()
            .expect("client should build")
    }

    /// Verify endpoint answer for one specific address
    pub async fn mock_verify(&mut self, email: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", VERIFY_PATH)
            .match_header("authorization", format!("Bearer {}", TEST_API_KEY).as_str())
            .match_body(Matcher::Json(json!({ "email": email })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Verify endpoint answer for any address, expected exactly `hits` times
    pub async fn mock_verify_any(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", VERIFY_PATH)
            .expect(hits)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn mock_account(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", ACCOUNT_PATH)
            .match_header("authorization", format!("Bearer {}", TEST_API_KEY).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

/// A verify response body for `email` in `state`
pub fn verdict(email: &str, state: &str) -> String {
    json!({
        "email": email,
        "state": state,
        "sub_state": "email_ok",
        "free_email": false,
        "role": false,
        "disposable": false
    })
    .to_string()
}
