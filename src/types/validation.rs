use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Coarse verdict category reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailState {
    Valid,
    Invalid,
    Risky,
    Unknown,
}

impl EmailState {
    /// Case-insensitive; anything unrecognised is `Unknown`.
    pub fn parse(state: &str) -> Self {
        match state.trim().to_ascii_lowercase().as_str() {
            "valid" => EmailState::Valid,
            "invalid" => EmailState::Invalid,
            "risky" => EmailState::Risky,
            _ => EmailState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailState::Valid => "valid",
            EmailState::Invalid => "invalid",
            EmailState::Risky => "risky",
            EmailState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EmailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one email address.
///
/// `state` keeps the service's spelling so it can be echoed into CSV output;
/// use [`ValidationResult::category`] for tallying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub free_email: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disposable: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub suggestion: Option<String>,
}

impl ValidationResult {
    pub fn category(&self) -> EmailState {
        EmailState::parse(&self.state)
    }

    /// Decode a verify response, echoing `requested` when the service omits the address.
    pub(crate) fn from_response(body: &[u8], requested: &str) -> serde_json::Result<Self> {
        let mut result: ValidationResult = serde_json::from_slice(body)?;
        if result.email.is_empty() {
            result.email = requested.to_string();
        }
        Ok(result)
    }
}

/// `null` decodes like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
