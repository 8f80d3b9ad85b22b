//! Truelist API client.
//!
//! Keep the public surface small: build a [`TruelistClient`] with
//! [`TruelistClientBuilder`], then call `validate` or `whoami`.
//! Implementation details are split into submodules under `src/client/`.

mod account;
pub mod builder;
pub mod core;
mod error_classification;
mod verify;

pub use builder::{TruelistClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::core::TruelistClient;
pub use verify::EmailValidator;
