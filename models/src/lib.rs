//! Domain models for VibeWise.
//!
//! Pure data structures exchanged between the session, camera and
//! orchestration layers. Models validate themselves on construction but carry
//! no I/O.

pub mod auth_state;
pub mod detection;
pub mod error;
pub mod playlist;
pub mod return_intent;

pub use auth_state::{AuthState, Identity};
pub use detection::DetectionResult;
pub use error::model_error::ModelError;
pub use playlist::{PlaylistInfo, PlaylistSummary};
pub use return_intent::ReturnIntent;
pub use return_intent::builder::ReturnIntentBuilder;

#[cfg(test)]
mod tests;
