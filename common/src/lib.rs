//! Shared utilities for the VibeWise client.
//!
//! This crate holds the small building blocks every other crate leans on:
//! error locations, HTTP status classification, and secret wrappers.
//!
//! ## Architecture
//!
//! - **common** (this crate): Cross-cutting utilities
//! - **models**: Pure data exchanged with the VibeWise API
//! - **vibewise-core**: Session, camera, capture and orchestration logic
//! - **vibewise**: Terminal front end wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;
