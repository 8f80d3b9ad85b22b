//! HTTP transport layer.
//!
//! Performs one authenticated exchange with the Truelist API and hands back the
//! raw status and body. Mapping status codes to meaning is the client's job.

pub mod http;

pub use http::{HttpTransport, RawResponse, TransportError, USER_AGENT};
