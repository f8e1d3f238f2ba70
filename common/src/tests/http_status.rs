// Unit tests for HttpStatusCode classification

use crate::HttpStatusCode;

/// **VALUE**: Verifies 401 is recognised as the session-expired signal.
///
/// **WHY THIS MATTERS**: The detection and playlist flows release the camera and
/// redirect to login only when this classification says the session is gone.
///
/// **BUG THIS CATCHES**: Would catch if `is_unauthorized` matched the whole 4xx
/// range, turning validation errors into spurious logouts.
#[test]
fn given_401_when_classified_then_is_unauthorized_only() {
    assert!(HttpStatusCode(401).is_unauthorized());
    assert!(HttpStatusCode(401).is_client_error());
    assert!(!HttpStatusCode(400).is_unauthorized());
    assert!(!HttpStatusCode(403).is_unauthorized());
}

/// **VALUE**: Verifies range boundaries for success, client and server errors.
///
/// **BUG THIS CATCHES**: Off-by-one range mistakes (e.g. 300 counted as success).
#[test]
fn given_boundary_codes_when_classified_then_ranges_are_exclusive() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());
    assert!(HttpStatusCode(500).is_server_error());
    assert!(!HttpStatusCode(499).is_server_error());
    assert_eq!(HttpStatusCode::from(418).to_string(), "418");
}
