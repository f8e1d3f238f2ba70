// Unit tests for error classification and user-facing messages

use crate::error::api::{ApiError, MISSING_CSRF_TOKEN_MESSAGE, SESSION_EXPIRED_MESSAGE};
use crate::error::camera::CameraError;

/// **VALUE**: Verifies each camera failure kind has its own wording.
///
/// **WHY THIS MATTERS**: Users fix a denied permission differently from a
/// missing device; a generic message leaves them stuck.
///
/// **BUG THIS CATCHES**: Would catch the variants collapsing into one message.
#[test]
fn given_camera_failures_when_user_message_then_distinct_per_kind() {
    assert_eq!(
        CameraError::permission_denied().user_message(),
        "Failed to access camera. Please allow camera access in your browser."
    );
    assert_eq!(
        CameraError::device_not_found().user_message(),
        "Failed to access camera. No camera found on your device."
    );
    assert_eq!(
        CameraError::device("Device busy").user_message(),
        "Failed to access camera. Device busy"
    );
}

/// **VALUE**: Verifies 401 is distinguishable from other rejections.
///
/// **BUG THIS CATCHES**: Would catch a 401 mapped to `RemoteRejected`, which
/// would show an error instead of redirecting to login.
#[test]
fn given_session_expired_when_classified_then_status_401_and_flagged() {
    let err = ApiError::session_expired();

    assert!(err.is_session_expired());
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.user_message(), SESSION_EXPIRED_MESSAGE);
}

#[test]
fn given_remote_rejection_when_classified_then_category_follows_status() {
    let server = ApiError::remote_rejected(500, "boom");
    let client = ApiError::remote_rejected(400, "No image provided");

    assert_eq!(server.error_category(), "server_error");
    assert_eq!(client.error_category(), "client_error");
    assert_eq!(client.user_message(), "No image provided");
    assert!(!client.is_session_expired());
}

/// **VALUE**: Verifies user messages carry no source locations.
///
/// **BUG THIS CATCHES**: Would catch `to_string()` (which includes file:line)
/// being used for notifications.
#[test]
fn given_missing_csrf_when_displayed_then_user_message_has_no_location() {
    let err = ApiError::missing_csrf_token();

    assert_eq!(err.user_message(), MISSING_CSRF_TOKEN_MESSAGE);
    assert!(err.to_string().contains("Missing CSRF Token Error"));
    assert!(!err.user_message().contains(".rs"));
}
