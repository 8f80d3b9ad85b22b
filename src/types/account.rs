use super::validation::null_as_default;
use serde::{Deserialize, Serialize};

/// The account behind the configured API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan: String,
    /// Remaining validation quota.
    #[serde(default, deserialize_with = "null_as_default")]
    pub credits: i64,
}
