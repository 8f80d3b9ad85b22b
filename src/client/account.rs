use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::core::TruelistClient;
use super::error_classification::Operation;
use crate::types::AccountInfo;
use crate::Result;

impl TruelistClient {
    /// Fetch the account behind the API key.
    pub async fn whoami(&self, cancel: &CancellationToken) -> Result<AccountInfo> {
        self.call_json(Operation::Account, Method::GET, None, cancel)
            .await
    }
}
