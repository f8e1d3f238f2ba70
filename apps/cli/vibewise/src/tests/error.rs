// Unit tests for error module
// Tests serialization and conversion from core errors

use crate::error::VibewiseError;

use common::ErrorLocation;

use vibewise_core::error::{ApiError, ConfigError, OrchestratorError};

use std::panic::Location;

/// **VALUE**: Tests that errors can be serialized for structured logs.
///
/// **BUG THIS CATCHES**: Would catch if someone removes the `#[derive(Serialize)]`
/// or adds a non-serializable field such as a raw `std::io::Error`.
#[test]
fn given_vibewise_error_when_serialized_then_tagged_json() {
    // GIVEN
    let err = VibewiseError::Input {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let json = serde_json::to_string(&err).expect("serializable");

    // THEN
    assert!(json.contains("\"type\":\"Input\""), "JSON should contain variant name");
    assert!(json.contains("Test"), "JSON should contain message");
}

/// **VALUE**: API errors convert using the user-facing message.
///
/// **WHY THIS MATTERS**: These messages end up on the terminal. Internal
/// detail like URLs or status lines belongs in the log, not the prompt.
#[test]
fn given_api_error_when_converted_then_core_variant_with_user_message() {
    let err: VibewiseError = ApiError::session_expired().into();

    match err {
        VibewiseError::Core { message, .. } => {
            assert_eq!(message, "Session expired. Please login again.");
        }
        other => panic!("expected Core, got {other:?}"),
    }
}

#[test]
fn given_config_error_when_converted_then_config_variant() {
    let err: VibewiseError = ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: String::from("bad timeout"),
    }
    .into();

    assert!(matches!(err, VibewiseError::Config { ref message, .. } if message.contains("bad timeout")));
}

#[test]
fn given_actor_stopped_when_converted_then_core_variant() {
    let err: VibewiseError = OrchestratorError::actor_stopped("gone").into();

    assert!(err.to_string().starts_with("Core Error:"));
}
