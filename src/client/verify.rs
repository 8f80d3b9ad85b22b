//! Single-address verification.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::core::TruelistClient;
use super::error_classification::Operation;
use crate::types::ValidationResult;
use crate::Result;

/// Anything that can validate one address. The batch runner is written
/// against this so it can be driven by the real client or by a stand-in.
#[async_trait]
pub trait EmailValidator: Send + Sync {
    async fn validate(&self, cancel: &CancellationToken, email: &str) -> Result<ValidationResult>;
}

impl TruelistClient {
    /// Verify one address.
    ///
    /// 401 is [`crate::Error::Unauthorized`], 429 is [`crate::Error::RateLimited`],
    /// other non-2xx is [`crate::Error::Api`], and an undecodable 2xx body is
    /// [`crate::Error::Decode`].
    pub async fn validate(
        &self,
        cancel: &CancellationToken,
        email: &str,
    ) -> Result<ValidationResult> {
        let payload = json!({ "email": email });
        self.call(
            Operation::Verify,
            Method::POST,
            Some(&payload),
            cancel,
            |body| ValidationResult::from_response(body, email),
        )
        .await
    }
}

#[async_trait]
impl EmailValidator for TruelistClient {
    async fn validate(&self, cancel: &CancellationToken, email: &str) -> Result<ValidationResult> {
        TruelistClient::validate(self, cancel, email).await
    }
}
