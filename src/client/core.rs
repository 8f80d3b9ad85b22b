use crate::resilience::rate_limiter::{RateLimiter, RateLimiterSnapshot};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::error_classification::{classify_response, Operation};

/// Truelist API client.
///
/// One instance per invocation. `&self` methods are safe to call from concurrent
/// tasks; the limiter is the only shared mutable state and it is owned here, so
/// separate clients never throttle each other.
#[derive(Debug)]
pub struct TruelistClient {
    pub(crate) transport: HttpTransport,
    pub(crate) limiter: RateLimiter,
}

impl TruelistClient {
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Current limiter state, for diagnostics.
    pub async fn rate_limit_snapshot(&self) -> RateLimiterSnapshot {
        self.limiter.snapshot().await
    }

    /// Pace, send, classify the status, decode the body.
    ///
    /// `decode` sees the raw body only for 2xx responses.
    pub(crate) async fn call<T, F>(
        &self,
        op: Operation,
        method: Method,
        body: Option<&serde_json::Value>,
        cancel: &CancellationToken,
        decode: F,
    ) -> Result<T>
    where
        F: FnOnce(&[u8]) -> serde_json::Result<T>,
    {
        self.limiter.acquire(cancel).await?;

        let start = Instant::now();
        let resp = self.transport.send(method, op.path(), body, cancel).await?;

        if let Some(err) = classify_response(op, &resp) {
            info!(
                http_status = resp.status,
                endpoint = op.path(),
                duration_ms = start.elapsed().as_millis() as u64,
                "truelist request failed"
            );
            return Err(err);
        }

        decode(&resp.body).map_err(Error::Decode)
    }

    pub(crate) async fn call_json<T: DeserializeOwned>(
        &self,
        op: Operation,
        method: Method,
        body: Option<&serde_json::Value>,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.call(op, method, body, cancel, |bytes| serde_json::from_slice(bytes))
            .await
    }
}
