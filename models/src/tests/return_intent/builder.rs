use crate::{ModelError, ReturnIntentBuilder};

/// **VALUE**: Verifies a complete intent builds and serializes with the storage keys.
///
/// **WHY THIS MATTERS**: The web client and this client share the `returnTo` /
/// `autoStartCamera` keys; renaming them silently breaks resume-after-login.
///
/// **BUG THIS CATCHES**: Would catch a dropped `#[serde(rename)]`.
#[test]
fn given_valid_fields_when_building_then_serializes_with_storage_keys() {
    // GIVEN: A builder for the home page with auto-start
    let intent = ReturnIntentBuilder::default()
        .with_return_path("/")
        .with_auto_start_capture(true)
        .build()
        .unwrap();

    // WHEN: Serializing
    let json = serde_json::to_value(&intent).unwrap();

    // THEN: Storage keys are used
    assert_eq!(json["returnTo"], "/");
    assert_eq!(json["autoStartCamera"], true);
    assert!(intent.auto_start_capture());
}

#[test]
fn given_missing_path_when_building_then_returns_validation_error() {
    let result = ReturnIntentBuilder::default()
        .with_auto_start_capture(true)
        .build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Return path is required");
        }
    }
}

/// **VALUE**: Verifies absolute and protocol-relative targets are rejected.
///
/// **BUG THIS CATCHES**: Would catch the intent being usable to bounce users to
/// another origin after login.
#[test]
fn given_non_relative_path_when_building_then_returns_validation_error() {
    for path in ["https://evil.example/", "//evil.example/", "profile/"] {
        let result = ReturnIntentBuilder::default().with_return_path(path).build();
        assert!(result.is_err(), "{path} should be rejected");
    }
}

#[test]
fn given_no_auto_start_when_building_then_defaults_to_false() {
    let intent = ReturnIntentBuilder::default()
        .with_return_path("/profile/")
        .build()
        .unwrap();

    assert!(!intent.auto_start_capture());
    assert_eq!(intent.return_path(), "/profile/");
}
