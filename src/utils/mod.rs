//! Shared helpers for the HTTP layer.
//!
//! - [`client_ip`]: Caller address resolution from proxy headers
//! - [`cookies`]: Session cookie construction
//! - [`conflict`]: Repository error mapping for writes

pub mod client_ip;
pub mod conflict;
pub mod cookies;
