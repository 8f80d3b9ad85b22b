//! # truelist
//!
//! Client library behind the `truelist` command-line tool for the Truelist.io
//! email validation API.
//!
//! ## Overview
//!
//! A [`TruelistClient`] is bound to one API key and base URL. Every call first
//! takes a token from the client's own rate limiter (10 requests per rolling
//! one-second window by default), then performs one authenticated HTTP
//! exchange and maps the status code to a typed [`Error`].
//!
//! Every suspending operation takes a [`tokio_util::sync::CancellationToken`];
//! a waiting limiter or an in-flight request returns a cancellation error as
//! soon as the token fires.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use truelist::TruelistClientBuilder;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> truelist::Result<()> {
//!     let client = TruelistClientBuilder::new("tk_live_example").build()?;
//!     let cancel = CancellationToken::new();
//!
//!     let result = client.validate(&cancel, "jane@example.com").await?;
//!     println!("{} is {}", result.email, result.category());
//!
//!     let account = client.whoami(&cancel).await?;
//!     println!("{} credits left", account.credits);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | API client, builder and the [`EmailValidator`] seam |
//! | [`resilience`] | Window-refill token bucket rate limiter |
//! | [`transport`] | Authenticated HTTP exchange |
//! | [`types`] | Validation result and account info |
//! | [`batch`] | Batch runner with per-item failure isolation, CSV mode |
//! | [`config`] | Persisted API key and environment fallback |
//! | [`output`] | Human, JSON and quiet rendering |

pub mod batch;
pub mod client;
pub mod config;
pub mod output;
pub mod resilience;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{EmailValidator, TruelistClient, TruelistClientBuilder};
pub use types::{AccountInfo, EmailState, ValidationResult};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
