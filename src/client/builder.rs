use crate::client::core::TruelistClient;
use crate::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.truelist.io";

/// Total per-request timeout unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`TruelistClient`].
///
/// Keep this surface area small: an API key is required, everything else has
/// a production default.
pub struct TruelistClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    rate_limit: RateLimiterConfig,
}

impl TruelistClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            rate_limit: RateLimiterConfig::default(),
        }
    }

    /// Point the client at another host (mock servers, staging).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Total timeout for a single request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Requests admitted per one-second window.
    pub fn rate_limit(mut self, per_second: u32) -> Self {
        self.rate_limit = self.rate_limit.with_capacity(per_second);
        self
    }

    pub fn rate_limit_config(mut self, cfg: RateLimiterConfig) -> Self {
        self.rate_limit = cfg;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TruelistClient> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::configuration_with_context(
                "API key must not be empty",
                ErrorContext::new().with_field_path("api_key"),
            ));
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL {:?}", self.base_url),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string()),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("invalid base URL {:?}", self.base_url),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details("scheme must be http or https"),
            ));
        }

        let transport = HttpTransport::new(&self.base_url, api_key, self.timeout)?;

        Ok(TruelistClient {
            transport,
            limiter: RateLimiter::new(self.rate_limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let client = TruelistClientBuilder::new("tk_test").build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_build_rejects_empty_key() {
        let err = TruelistClientBuilder::new("   ").build().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("api_key")
        );
    }

    #[test]
    fn test_build_rejects_bad_base_url() {
        let err = TruelistClientBuilder::new("k")
            .base_url("localhost:8080")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = TruelistClientBuilder::new("k")
            .base_url("::nope")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TruelistClientBuilder::new("k")
            .base_url("http://127.0.0.1:4010/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:4010");
    }

    #[tokio::test]
    async fn test_rate_limit_capacity_applied() {
        let client = TruelistClientBuilder::new("k").rate_limit(3).build().unwrap();
        assert_eq!(client.rate_limit_snapshot().await.capacity, 3);
    }
}
