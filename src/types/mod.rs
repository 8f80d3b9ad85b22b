//! Response types for the Truelist API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ValidationResult`] | Verdict for one email address |
//! | [`EmailState`] | Coarse verdict category (valid, invalid, risky, unknown) |
//! | [`AccountInfo`] | Authenticated account details |
//!
//! All of them are built fresh from a decoded response and never mutated afterwards.

pub mod account;
pub mod validation;

pub use account::AccountInfo;
pub use validation::{EmailState, ValidationResult};
